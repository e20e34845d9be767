// 该文件是 Xunren （寻人启事） 项目的一部分。
// src/pipeline.rs - 扫描流水线
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

use std::path::Path;
use std::time::Instant;

use thiserror::Error;
use tracing::info;

use crate::archive::{self, ArchiveError};
use crate::face::{FaceDetector, FaceError, FaceLocator};
use crate::ocr::{self, OcrError, TextRecognizer};
use crate::sheet::{self, SheetOutcome};

/// 扫描流水线各阶段的错误
#[derive(Debug, Error)]
pub enum PipelineError {
  /// 压缩包装载阶段出错
  #[error("压缩包装载失败: {0}")]
  Archive(#[from] ArchiveError),
  /// 文本识别阶段出错
  #[error("文本识别失败: {0}")]
  Ocr(#[from] OcrError),
  /// 人脸定位阶段出错
  #[error("人脸定位失败: {0}")]
  Face(#[from] FaceError),
}

/// 四阶段扫描流水线：装载、识别过滤、人脸定位、小样表渲染
///
/// 识别与检测后端在构造时注入，可对多个压缩包复用。
pub struct Pipeline<R: TextRecognizer, D: FaceDetector> {
  /// 文本识别后端
  recognizer: R,
  /// 人脸定位阶段
  locator: FaceLocator<D>,
}

impl<R: TextRecognizer, D: FaceDetector> Pipeline<R, D> {
  /// 用给定的识别与检测后端组装流水线
  pub fn new(recognizer: R, detector: D) -> Self {
    Self {
      recognizer,
      locator: FaceLocator::new(detector),
    }
  }

  /// 对一个压缩包跑完整条流水线
  ///
  /// 任一阶段出错则整体失败，不产生部分结果。
  pub fn run(&mut self, archive_path: &Path, word: &str) -> Result<Vec<SheetOutcome>, PipelineError> {
    info!("开始扫描 {}，关键词 {:?}", archive_path.display(), word);

    let now = Instant::now();
    let images = archive::load_archive_images(archive_path)?;
    info!("装载 {} 幅图像，耗时: {:.2?}", images.len(), now.elapsed());

    let now = Instant::now();
    let matched = ocr::filter_matches(&mut self.recognizer, word, images)?;
    info!("命中 {} 幅图像，耗时: {:.2?}", matched.len(), now.elapsed());

    let now = Instant::now();
    let sets = self.locator.locate_all(matched)?;
    let located: usize = sets.iter().map(|set| set.faces.len()).sum();
    info!("定位 {} 张人脸，耗时: {:.2?}", located, now.elapsed());

    let now = Instant::now();
    let outcomes = sheet::render_all(sets);
    info!("渲染完成，耗时: {:.2?}", now.elapsed());

    Ok(outcomes)
  }
}
