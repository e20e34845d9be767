// 该文件是 Xunren （寻人启事） 项目的一部分。
// src/face/seeta.rs - SeetaFace 人脸检测后端
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
use std::path::Path;

use image::GrayImage;
use tracing::debug;

use super::{FaceBox, FaceDetector, FaceError};

/// 检测的最小人脸边长（像素）
pub const MIN_FACE_SIZE: u32 = 20;
/// 检测窗口的得分阈值，低于该值的窗口将被丢弃
pub const SCORE_THRESH: f64 = 2.0;
/// 图像金字塔相邻两层的缩放系数，即 1.35 倍多尺度扫描步长的倒数
pub const PYRAMID_SCALE_FACTOR: f32 = 1.0 / 1.35;
/// 滑动窗口在横、纵方向上的步进（像素）
pub const SLIDE_WINDOW_STEP: u32 = 4;

/// 基于 SeetaFace 引擎的人脸检测后端
///
/// 模型在构造时读入一次，每次检测时从模型克隆出新的检测器。
pub struct SeetaDetector {
  /// SeetaFace 正面人脸模型
  model: rustface::Model,
}

impl SeetaDetector {
  /// 从模型文件创建检测后端
  pub fn from_file(path: &Path) -> Result<Self, FaceError> {
    let data = std::fs::read(path).map_err(|error| {
      FaceError::ModelLoad(format!("读取模型文件 {} 失败: {error}", path.display()))
    })?;
    Self::from_bytes(&data)
  }

  /// 从内存中的模型数据创建检测后端
  pub fn from_bytes(data: &[u8]) -> Result<Self, FaceError> {
    let model = rustface::read_model(Cursor::new(data))
      .map_err(|error| FaceError::ModelLoad(error.to_string()))?;
    Ok(Self { model })
  }
}

impl FaceDetector for SeetaDetector {
  fn detect(&mut self, gray: &GrayImage) -> Result<Vec<FaceBox>, FaceError> {
    let (width, height) = gray.dimensions();
    if width == 0 || height == 0 {
      return Ok(Vec::new());
    }

    let mut detector = rustface::create_detector_with_model(self.model.clone());
    detector.set_min_face_size(MIN_FACE_SIZE);
    detector.set_score_thresh(SCORE_THRESH);
    detector.set_pyramid_scale_factor(PYRAMID_SCALE_FACTOR);
    detector.set_slide_window_step(SLIDE_WINDOW_STEP, SLIDE_WINDOW_STEP);

    let faces = detector.detect(&rustface::ImageData::new(gray.as_raw(), width, height));
    debug!("检测到 {} 张人脸", faces.len());

    let mut boxes = Vec::with_capacity(faces.len());
    for face in &faces {
      let bbox = face.bbox();
      // 检测框可能略微越界，取其与图像的交集
      let left = bbox.x().clamp(0, width as i32) as u32;
      let top = bbox.y().clamp(0, height as i32) as u32;
      let right = (bbox.x() + bbox.width() as i32).clamp(0, width as i32) as u32;
      let bottom = (bbox.y() + bbox.height() as i32).clamp(0, height as i32) as u32;
      if right <= left || bottom <= top {
        continue;
      }
      boxes.push(FaceBox {
        x: left,
        y: top,
        width: right - left,
        height: bottom - top,
      });
    }
    Ok(boxes)
  }
}
