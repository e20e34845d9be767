// 该文件是 Xunren （寻人启事） 项目的一部分。
// src/face.rs - 人脸定位
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

use image::{GrayImage, imageops};
use thiserror::Error;
use tracing::debug;

use crate::archive::NamedImage;

/// 人脸边界框，像素坐标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceBox {
  /// 左上角 x 坐标
  pub x: u32,
  /// 左上角 y 坐标
  pub y: u32,
  /// 框宽度
  pub width: u32,
  /// 框高度
  pub height: u32,
}

/// 一张图像及其中检出的全部人脸
///
/// 人脸顺序为检测器返回顺序，允许为空（正常结果，非错误）。
#[derive(Debug, Clone)]
pub struct FaceSet {
  pub source: NamedImage,
  pub faces: Vec<FaceBox>,
}

#[derive(Error, Debug)]
pub enum FaceError {
  #[error("人脸检测模型加载失败: {0}")]
  ModelLoad(String),
  #[error("人脸检测失败: {0}")]
  Detect(String),
}

/// 人脸检测后端
///
/// 输入为单通道灰度图，输出边界框保证落在图像范围内。
pub trait FaceDetector {
  fn detect(&mut self, gray: &GrayImage) -> Result<Vec<FaceBox>, FaceError>;
}

/// 人脸定位阶段
///
/// 检测资源在构造时注入，对每张图像先转灰度再检测，
/// 灰度缓冲用完即弃。
pub struct FaceLocator<D: FaceDetector> {
  detector: D,
}

impl<D: FaceDetector> FaceLocator<D> {
  pub fn new(detector: D) -> Self {
    Self { detector }
  }

  /// 对整批图像逐张定位人脸，顺序与输入一致
  pub fn locate_all(&mut self, images: Vec<NamedImage>) -> Result<Vec<FaceSet>, FaceError> {
    let mut sets = Vec::with_capacity(images.len());

    for entry in images {
      let gray = imageops::grayscale(&entry.image);
      let faces = self.detector.detect(&gray)?;
      debug!("图像 {} 中检出 {} 张人脸", entry.name, faces.len());
      sets.push(FaceSet {
        source: entry,
        faces,
      });
    }

    Ok(sets)
  }
}

mod seeta;
pub use self::seeta::SeetaDetector;

#[cfg(test)]
mod tests {
  use super::*;
  use image::RgbImage;
  use std::cell::RefCell;
  use std::rc::Rc;

  /// 记录入参并按调用顺序返回预置结果的检测桩
  struct StubDetector {
    results: Vec<Result<Vec<FaceBox>, ()>>,
    next: usize,
    seen_dimensions: Rc<RefCell<Vec<(u32, u32)>>>,
  }

  impl StubDetector {
    fn new(results: Vec<Result<Vec<FaceBox>, ()>>) -> Self {
      Self {
        results,
        next: 0,
        seen_dimensions: Rc::new(RefCell::new(Vec::new())),
      }
    }

    fn dimension_log(&self) -> Rc<RefCell<Vec<(u32, u32)>>> {
      Rc::clone(&self.seen_dimensions)
    }
  }

  impl FaceDetector for StubDetector {
    fn detect(&mut self, gray: &GrayImage) -> Result<Vec<FaceBox>, FaceError> {
      self.seen_dimensions.borrow_mut().push(gray.dimensions());
      let result = self.results[self.next].clone();
      self.next += 1;
      result.map_err(|_| FaceError::Detect("模拟检测失败".to_string()))
    }
  }

  fn page(name: &str, width: u32, height: u32) -> NamedImage {
    NamedImage {
      image: RgbImage::new(width, height),
      name: name.to_string(),
    }
  }

  fn face(x: u32, y: u32, width: u32, height: u32) -> FaceBox {
    FaceBox {
      x,
      y,
      width,
      height,
    }
  }

  #[test]
  fn grayscale_keeps_source_dimensions() {
    let detector = StubDetector::new(vec![Ok(Vec::new()), Ok(Vec::new())]);
    let seen = detector.dimension_log();

    let sets = FaceLocator::new(detector)
      .locate_all(vec![page("a.png", 12, 7), page("b.png", 3, 9)])
      .expect("定位失败");

    assert_eq!(sets.len(), 2);
    assert_eq!(*seen.borrow(), [(12, 7), (3, 9)]);
  }

  #[test]
  fn preserves_order_names_and_boxes() {
    let boxes = vec![face(1, 2, 3, 4), face(5, 6, 7, 8)];
    let detector = StubDetector::new(vec![Ok(boxes.clone()), Ok(Vec::new())]);

    let sets = FaceLocator::new(detector)
      .locate_all(vec![page("first.png", 20, 20), page("second.png", 20, 20)])
      .expect("定位失败");

    assert_eq!(sets[0].source.name, "first.png");
    assert_eq!(sets[0].faces, boxes);
    assert_eq!(sets[1].source.name, "second.png");
    assert!(sets[1].faces.is_empty());
  }

  #[test]
  fn empty_detection_is_a_normal_outcome() {
    let detector = StubDetector::new(vec![Ok(Vec::new())]);

    let sets = FaceLocator::new(detector)
      .locate_all(vec![page("plain.png", 10, 10)])
      .expect("定位失败");

    assert_eq!(sets.len(), 1);
    assert!(sets[0].faces.is_empty());
  }

  #[test]
  fn detector_failure_aborts_the_batch() {
    let detector = StubDetector::new(vec![Ok(Vec::new()), Err(())]);

    let err = FaceLocator::new(detector)
      .locate_all(vec![page("a.png", 4, 4), page("b.png", 4, 4)])
      .unwrap_err();

    assert!(matches!(err, FaceError::Detect(_)));
  }
}
