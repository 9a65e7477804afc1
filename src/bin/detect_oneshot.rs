// 该文件是 Guanwu （观物致知） 项目的一部分。
// src/bin/detect_oneshot.rs - 检测过滤主程序
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

use anyhow::Result;
use clap::Parser;
use url::Url;

use guanwu::{
  FromUrl,
  detect::filter_and_count,
  labels::LabelMap,
  model::{Model, ReplayDetector},
  report::{ConsoleReport, Render},
  source::TextSource,
};
use tracing::info;

/// Guanwu 检测流水线参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 标签映射来源 (file:// 或 https://)
  #[arg(long, value_name = "SOURCE")]
  pub labels: Url,

  /// 录制输出回放转储 (replay://)
  #[arg(long, value_name = "MODEL")]
  pub model: Url,

  /// 置信度阈值 (0.0 - 1.0)，严格大于阈值的候选才保留
  #[arg(long, default_value = "0.85", value_name = "THRESHOLD")]
  pub confidence: f32,

  /// 输入图像标识
  #[arg(value_name = "IMAGE")]
  pub image: String,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  info!("标签映射来源: {}", args.labels);
  info!("回放转储: {}", args.model);
  info!("置信度阈值: {}", args.confidence);
  info!("输入图像: {}", args.image);

  let mapping = TextSource::from_url(&args.labels)?;
  let label_map = LabelMap::from_source(mapping.text())?;
  info!("标签映射加载完成, 共 {} 个类别", label_map.len());

  let model = ReplayDetector::from_url(&args.model)?;

  info!("开始过滤...");
  let now = std::time::Instant::now();
  let raw = model.infer(args.image.as_str())?;
  let result = filter_and_count(&raw.labels, &raw.scores, &label_map, args.confidence)?;
  info!(
    "过滤完成，保留 {} 个检测，耗时: {:.2?}",
    result.0.len(),
    now.elapsed()
  );

  let output = ConsoleReport;
  output.render_result(&args.image, &result)?;

  Ok(())
}
