// 该文件是 Xunren （寻人启事） 项目的一部分。
// src/main.rs - 项目主程序
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

use anyhow::{Context, Result};
use tracing::warn;

use xunren::face::SeetaDetector;
use xunren::ocr::{DEFAULT_LANGUAGE, TesseractRecognizer};
use xunren::pipeline::Pipeline;
use xunren::sheet::{self, SheetOutcome};

/// SeetaFace 正面人脸模型路径
const FACE_MODEL_PATH: &str = "readonly/seeta_fd_frontal_v1.0.bin";
/// 小样表输出目录
const OUTPUT_DIR: &str = "output";
/// 待扫描的压缩包及其关键词
const RUNS: [(&str, &str); 2] = [
  ("readonly/small_img.zip", "Christopher"),
  ("readonly/images.zip", "Mark"),
];

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let detector = SeetaDetector::from_file(Path::new(FACE_MODEL_PATH))
    .with_context(|| format!("加载人脸模型 {FACE_MODEL_PATH} 失败"))?;
  let recognizer = TesseractRecognizer::new(DEFAULT_LANGUAGE).context("初始化文本识别失败")?;
  let mut pipeline = Pipeline::new(recognizer, detector);

  for (archive, word) in RUNS {
    let archive_path = Path::new(archive);
    let archive_name = archive_path
      .file_name()
      .map(|name| name.to_string_lossy().into_owned())
      .unwrap_or_else(|| archive.to_string());
    println!("----{word} in {archive_name}----");

    let outcomes = pipeline
      .run(archive_path, word)
      .with_context(|| format!("扫描 {archive} 失败"))?;

    let stem = archive_path
      .file_stem()
      .map(|stem| stem.to_string_lossy().into_owned())
      .unwrap_or_else(|| "archive".to_string());
    let sheet_dir = Path::new(OUTPUT_DIR).join(stem);

    for (index, outcome) in outcomes.into_iter().enumerate() {
      println!("Results found in {}", outcome.name());
      match outcome {
        SheetOutcome::Sheet { name, image } => {
          let path = sheet_dir.join(sheet::sheet_file_name(index, &name));
          save_sheet(&image, &path)?;
        }
        SheetOutcome::NoFaces { .. } => {
          println!("But there is no faces in that file!");
        }
      }
    }
  }

  Ok(())
}

/// 保存小样表，父目录不存在时先行创建
fn save_sheet(image: &image::RgbImage, path: &Path) -> Result<()> {
  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("创建输出目录 {} 失败", parent.display()))?;
  }

  image
    .save(path)
    .with_context(|| format!("保存小样表 {} 失败", path.display()))?;

  warn!("保存图像到文件: {}", path.display());

  Ok(())
}
