// 该文件是 Xunren （寻人启事） 项目的一部分。
// src/ocr/tesseract.rs - Tesseract 文本识别后端
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

use std::io::Cursor;

use image::{ImageFormat, RgbImage};
use leptess::LepTess;
use tracing::debug;

use super::{OcrError, TextRecognizer};

/// Tesseract 默认识别语言
pub const DEFAULT_LANGUAGE: &str = "eng";

/// 基于 Tesseract 的文本识别后端
///
/// 引擎句柄在构造时初始化一次，之后逐张喂入图像。
/// 图像以内存中的 PNG 形式传入，由 Leptonica 再行解码。
pub struct TesseractRecognizer {
  engine: LepTess,
}

impl TesseractRecognizer {
  /// 以指定语言初始化识别引擎
  ///
  /// 语言数据缺失时初始化失败。
  pub fn new(language: &str) -> Result<Self, OcrError> {
    let engine = LepTess::new(None, language).map_err(|e| {
      OcrError::Init(format!("语言 {language} 的识别引擎创建失败: {e}"))
    })?;

    Ok(Self { engine })
  }
}

impl TextRecognizer for TesseractRecognizer {
  fn recognize(&mut self, image: &RgbImage) -> Result<String, OcrError> {
    let mut encoded = Cursor::new(Vec::new());
    image.write_to(&mut encoded, ImageFormat::Png)?;

    self
      .engine
      .set_image_from_mem(encoded.get_ref())
      .map_err(|e| OcrError::Recognize(format!("无法装入图像: {e}")))?;

    let text = self
      .engine
      .get_utf8_text()
      .map_err(|e| OcrError::Recognize(format!("无法提取文本: {e}")))?;

    debug!("识别出 {} 个字符", text.chars().count());
    Ok(text)
  }
}
