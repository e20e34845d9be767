// 该文件是 Xunren （寻人启事） 项目的一部分。
// src/sheet.rs - 人脸小样表渲染
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
use image::imageops::{self, FilterType};
use tracing::debug;

use crate::face::{FaceBox, FaceSet};

/// 小样表的固定列数
pub const SHEET_COLUMNS: u32 = 5;

/// 人脸小样表的版面
///
/// 单元格取人脸框中的最大宽与最大高，列数固定为 [`SHEET_COLUMNS`]，
/// 行数按人脸数向上取整。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
  /// 单元格宽度（像素）
  pub cell_width: u32,
  /// 单元格高度（像素）
  pub cell_height: u32,
  /// 行数
  pub rows: u32,
}

impl SheetLayout {
  /// 根据人脸框计算版面，没有人脸时返回 `None`
  pub fn for_faces(faces: &[FaceBox]) -> Option<Self> {
    let cell_width = faces.iter().map(|face| face.width).max()?;
    let cell_height = faces.iter().map(|face| face.height).max()?;
    let rows = (faces.len() as u32).div_ceil(SHEET_COLUMNS);
    Some(Self {
      cell_width,
      cell_height,
      rows,
    })
  }

  /// 小样表的总宽度，始终按整行的五列预留
  pub fn sheet_width(&self) -> u32 {
    self.cell_width * SHEET_COLUMNS
  }

  /// 小样表的总高度
  pub fn sheet_height(&self) -> u32 {
    self.cell_height * self.rows
  }

  /// 第 `index` 张人脸所在单元格的左上角坐标
  pub fn cell_origin(&self, index: usize) -> (u32, u32) {
    let index = index as u32;
    (
      (index % SHEET_COLUMNS) * self.cell_width,
      (index / SHEET_COLUMNS) * self.cell_height,
    )
  }
}

/// 单个压缩包条目的渲染结果
#[derive(Debug, Clone)]
pub enum SheetOutcome {
  /// 条目中检出了人脸，渲染出小样表
  Sheet {
    /// 压缩包内的条目名
    name: String,
    /// 渲染好的小样表
    image: RgbImage,
  },
  /// 条目中没有检出人脸
  NoFaces {
    /// 压缩包内的条目名
    name: String,
  },
}

impl SheetOutcome {
  /// 渲染结果对应的条目名
  pub fn name(&self) -> &str {
    match self {
      SheetOutcome::Sheet { name, .. } | SheetOutcome::NoFaces { name } => name,
    }
  }
}

/// 把一幅图中的人脸裁出并拉伸到统一单元格，按行拼成小样表
///
/// 人脸自左向右填充，每满五张换行，未填充的单元格保持黑色。
/// 没有人脸时返回 `None`。
pub fn render_sheet(source: &RgbImage, faces: &[FaceBox]) -> Option<RgbImage> {
  let layout = SheetLayout::for_faces(faces)?;
  let mut canvas = RgbImage::new(layout.sheet_width(), layout.sheet_height());
  for (index, face) in faces.iter().enumerate() {
    let crop = imageops::crop_imm(source, face.x, face.y, face.width, face.height).to_image();
    let cell = imageops::resize(
      &crop,
      layout.cell_width,
      layout.cell_height,
      FilterType::Triangle,
    );
    let (x, y) = layout.cell_origin(index);
    imageops::replace(&mut canvas, &cell, i64::from(x), i64::from(y));
  }
  debug!(
    "渲染 {} 张人脸，小样表 {}x{}",
    faces.len(),
    layout.sheet_width(),
    layout.sheet_height()
  );
  Some(canvas)
}

/// 逐条目渲染小样表，保持输入顺序
pub fn render_all(sets: Vec<FaceSet>) -> Vec<SheetOutcome> {
  sets
    .into_iter()
    .map(|set| match render_sheet(&set.source.image, &set.faces) {
      Some(image) => SheetOutcome::Sheet {
        name: set.source.name,
        image,
      },
      None => SheetOutcome::NoFaces {
        name: set.source.name,
      },
    })
    .collect()
}

/// 由条目在扫描结果中的序号及条目名生成小样表的文件名
///
/// 路径分隔符压平为下划线，末尾扩展名替换为 `-faces.png`。
/// 压平和去扩展名都可能让不同条目撞名，零填充的序号前缀
/// 保证同一次扫描内文件名互不相同。
pub fn sheet_file_name(index: usize, entry_name: &str) -> String {
  let flat: String = entry_name
    .chars()
    .map(|c| if c == '/' || c == '\\' { '_' } else { c })
    .collect();
  let stem = match flat.rsplit_once('.') {
    Some((stem, _)) if !stem.is_empty() => stem,
    _ => flat.as_str(),
  };
  format!("{index:03}-{stem}-faces.png")
}
