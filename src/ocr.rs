// 该文件是 Xunren （寻人启事） 项目的一部分。
// src/ocr.rs - 文本识别与关键词过滤
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use image::RgbImage;
use thiserror::Error;
use tracing::debug;

use crate::archive::NamedImage;

#[derive(Error, Debug)]
pub enum OcrError {
  #[error("OCR 引擎初始化失败: {0}")]
  Init(String),
  #[error("文本识别失败: {0}")]
  Recognize(String),
  #[error("图像编码失败: {0}")]
  Encode(#[from] image::ImageError),
}

/// 文本识别后端
///
/// 识别结果为整页文本，可能为空串。后端通常持有可变句柄，
/// 因此识别操作采用 `&mut self`。
pub trait TextRecognizer {
  fn recognize(&mut self, image: &RgbImage) -> Result<String, OcrError>;
}

/// 按关键词过滤图像
///
/// 对每张图像独立识别整页文本，保留其中含有 `word` 的条目
/// （区分大小写的字面子串匹配），输出顺序与输入一致。
/// 任意一张图像识别失败即整体失败。
pub fn filter_matches<R: TextRecognizer>(
  recognizer: &mut R,
  word: &str,
  images: Vec<NamedImage>,
) -> Result<Vec<NamedImage>, OcrError> {
  let mut matches = Vec::new();

  for entry in images {
    let text = recognizer.recognize(&entry.image)?;
    if text.contains(word) {
      debug!("图像 {} 含有关键词 {}", entry.name, word);
      matches.push(entry);
    } else {
      debug!("图像 {} 不含关键词 {}", entry.name, word);
    }
  }

  Ok(matches)
}

mod tesseract;
pub use self::tesseract::{DEFAULT_LANGUAGE, TesseractRecognizer};

#[cfg(test)]
mod tests {
  use super::*;
  use image::RgbImage;

  /// 按调用顺序返回预置文本的识别桩
  struct ScriptedRecognizer {
    lines: Vec<Result<&'static str, ()>>,
    next: usize,
  }

  impl ScriptedRecognizer {
    fn new(lines: Vec<Result<&'static str, ()>>) -> Self {
      Self { lines, next: 0 }
    }
  }

  impl TextRecognizer for ScriptedRecognizer {
    fn recognize(&mut self, _image: &RgbImage) -> Result<String, OcrError> {
      let line = self.lines[self.next];
      self.next += 1;
      line
        .map(str::to_string)
        .map_err(|_| OcrError::Recognize("模拟识别失败".to_string()))
    }
  }

  fn pages(count: usize) -> Vec<NamedImage> {
    (0..count)
      .map(|index| NamedImage {
        image: RgbImage::new(4, 4),
        name: format!("page-{index}.png"),
      })
      .collect()
  }

  #[test]
  fn keeps_matching_entries_in_input_order() {
    let mut recognizer = ScriptedRecognizer::new(vec![
      Ok("Christopher Test"),
      Ok("nothing of note"),
      Ok("Mr. Christopher again"),
    ]);

    let kept = filter_matches(&mut recognizer, "Christopher", pages(3)).expect("过滤失败");

    let names: Vec<&str> = kept.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["page-0.png", "page-2.png"]);
  }

  #[test]
  fn match_is_case_sensitive() {
    let mut recognizer =
      ScriptedRecognizer::new(vec![Ok("christopher in lowercase"), Ok("Christopher")]);

    let kept = filter_matches(&mut recognizer, "Christopher", pages(2)).expect("过滤失败");

    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].name, "page-1.png");
  }

  #[test]
  fn no_match_yields_empty_output() {
    let mut recognizer = ScriptedRecognizer::new(vec![Ok("alpha"), Ok("beta")]);

    let kept = filter_matches(&mut recognizer, "Zephyr", pages(2)).expect("过滤失败");

    assert!(kept.is_empty());
  }

  #[test]
  fn single_failure_aborts_the_batch() {
    let mut recognizer = ScriptedRecognizer::new(vec![Ok("Christopher"), Err(())]);

    let err = filter_matches(&mut recognizer, "Christopher", pages(2)).unwrap_err();

    assert!(matches!(err, OcrError::Recognize(_)));
  }

  #[test]
  fn empty_input_is_fine() {
    let mut recognizer = ScriptedRecognizer::new(Vec::new());
    let kept = filter_matches(&mut recognizer, "Christopher", Vec::new()).expect("过滤失败");
    assert!(kept.is_empty());
  }
}
