// 该文件是 Xunren （寻人启事） 项目的一部分。
// src/bin/scan.rs - 单次扫描命令行
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
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;

use xunren::face::SeetaDetector;
use xunren::ocr::{DEFAULT_LANGUAGE, TesseractRecognizer};
use xunren::pipeline::Pipeline;
use xunren::sheet::{self, SheetOutcome};

/// Xunren 单次扫描参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 待扫描的压缩包路径
  #[arg(long, value_name = "ARCHIVE")]
  pub archive: PathBuf,
  /// 匹配关键词，区分大小写
  #[arg(long, value_name = "WORD")]
  pub word: String,
  /// SeetaFace 人脸模型路径
  #[arg(
    long,
    value_name = "MODEL",
    default_value = "readonly/seeta_fd_frontal_v1.0.bin"
  )]
  pub model: PathBuf,
  /// 小样表输出目录
  #[arg(long, value_name = "DIR", default_value = "output")]
  pub out_dir: PathBuf,
  /// Tesseract 识别语言
  #[arg(long, value_name = "LANG", default_value = DEFAULT_LANGUAGE)]
  pub language: String,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  let detector = SeetaDetector::from_file(&args.model)
    .with_context(|| format!("加载人脸模型 {} 失败", args.model.display()))?;
  let recognizer = TesseractRecognizer::new(&args.language).context("初始化文本识别失败")?;
  let mut pipeline = Pipeline::new(recognizer, detector);

  let archive_name = args
    .archive
    .file_name()
    .map(|name| name.to_string_lossy().into_owned())
    .unwrap_or_else(|| args.archive.display().to_string());
  println!("----{} in {}----", args.word, archive_name);

  let outcomes = pipeline
    .run(&args.archive, &args.word)
    .with_context(|| format!("扫描 {} 失败", args.archive.display()))?;

  for (index, outcome) in outcomes.into_iter().enumerate() {
    println!("Results found in {}", outcome.name());
    match outcome {
      SheetOutcome::Sheet { name, image } => {
        let path = args.out_dir.join(sheet::sheet_file_name(index, &name));
        save_sheet(&image, &path)?;
      }
      SheetOutcome::NoFaces { .. } => {
        println!("But there is no faces in that file!");
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
