// 该文件是 Xunren （寻人启事） 项目的一部分。
// src/archive.rs - 压缩包图像装载
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

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use image::RgbImage;
use thiserror::Error;
use tracing::debug;
use zip::ZipArchive;

/// 解码后的图像及其压缩包条目名
///
/// 条目名在各阶段间原样传递，仅作展示标签使用。
#[derive(Debug, Clone)]
pub struct NamedImage {
  /// RGB 图像数据
  pub image: RgbImage,
  /// 压缩包中的条目名
  pub name: String,
}

#[derive(Error, Debug)]
pub enum ArchiveError {
  #[error("I/O 错误: {0}")]
  Io(#[from] std::io::Error),
  #[error("压缩包格式无效: {0}")]
  Zip(#[from] zip::result::ZipError),
  #[error("条目 {name} 无法解码为图像: {source}")]
  Decode {
    name: String,
    source: image::ImageError,
  },
}

/// 装载压缩包内的全部图像
///
/// 按中央目录顺序逐条读取并解码，目录条目被跳过。
/// 任意条目解码失败即整体失败，不返回部分结果。
pub fn load_archive_images(path: &Path) -> Result<Vec<NamedImage>, ArchiveError> {
  let file = File::open(path)?;
  let mut archive = ZipArchive::new(BufReader::new(file))?;

  let mut images = Vec::new();

  for index in 0..archive.len() {
    let mut entry = archive.by_index(index)?;

    if entry.is_dir() {
      continue;
    }

    let name = entry.name().to_string();
    let mut raw = Vec::with_capacity(entry.size() as usize);
    entry.read_to_end(&mut raw)?;

    let image = image::load_from_memory(&raw)
      .map_err(|source| ArchiveError::Decode {
        name: name.clone(),
        source,
      })?
      .to_rgb8();

    debug!("解码条目 {}: {}x{}", name, image.width(), image.height());
    images.push(NamedImage { image, name });
  }

  Ok(images)
}
