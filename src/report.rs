// 该文件是 Guanwu （观物致知） 项目的一部分。
// src/report.rs - 解码结果输出
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

use std::io::Write;

use crate::classify::Prediction;
use crate::detect::{Detection, DetectionSummary};

pub trait Render<R>: Sized {
  type Error;
  fn render_result(&self, source: &str, result: &R) -> Result<(), Self::Error>;
}

const SEPARATOR: &str = "====================";

/// 预测结果格式: `label (confidence)`
pub fn format_prediction(prediction: &Prediction) -> String {
  format!("{} ({:.4})", prediction.label, prediction.confidence)
}

/// 检测结果分两段输出：先按输入顺序列出保留的检测，再列各类别计数。
/// 计数按类别名排序，保证输出稳定。
pub fn format_detections(retained: &[Detection], summary: &DetectionSummary) -> String {
  let mut out = String::new();

  out.push_str("检测到的对象:\n");
  out.push_str(SEPARATOR);
  out.push('\n');
  for detection in retained {
    out.push_str(&format!(
      "  - {}: {:.2}%\n",
      detection.label,
      detection.confidence * 100.0
    ));
  }

  out.push('\n');
  out.push_str("各类别计数:\n");
  out.push_str(SEPARATOR);
  out.push('\n');
  let mut counts: Vec<(&String, &usize)> = summary.iter().collect();
  counts.sort_by(|a, b| a.0.cmp(b.0));
  for (label, count) in counts {
    out.push_str(&format!("  {}: {}\n", label, count));
  }

  out
}

/// 标准输出渲染
pub struct ConsoleReport;

impl Render<Prediction> for ConsoleReport {
  type Error = std::io::Error;

  fn render_result(&self, source: &str, result: &Prediction) -> Result<(), Self::Error> {
    let mut out = std::io::stdout().lock();
    writeln!(out, "{}: {}", source, format_prediction(result))?;
    Ok(())
  }
}

impl Render<(Vec<Detection>, DetectionSummary)> for ConsoleReport {
  type Error = std::io::Error;

  fn render_result(
    &self,
    source: &str,
    result: &(Vec<Detection>, DetectionSummary),
  ) -> Result<(), Self::Error> {
    let (retained, summary) = result;
    let mut out = std::io::stdout().lock();
    writeln!(out, "{}:", source)?;
    write!(out, "{}", format_detections(retained, summary))?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_format_prediction() {
    let prediction = Prediction {
      label: "dog".to_string(),
      confidence: 0.9362,
    };
    assert_eq!(format_prediction(&prediction), "dog (0.9362)");
  }

  #[test]
  fn test_format_detections_sections() {
    let retained = vec![
      Detection {
        label_index: 1,
        label: "person".to_string(),
        confidence: 0.9,
      },
      Detection {
        label_index: 1,
        label: "person".to_string(),
        confidence: 0.86,
      },
    ];
    let mut summary = DetectionSummary::new();
    summary.insert("person".to_string(), 2);

    let text = format_detections(&retained, &summary);
    let expected = "检测到的对象:\n\
                    ====================\n  \
                    - person: 90.00%\n  \
                    - person: 86.00%\n\n\
                    各类别计数:\n\
                    ====================\n  \
                    person: 2\n";
    assert_eq!(text, expected);
  }

  #[test]
  fn test_format_detections_counts_sorted_by_label() {
    let retained = vec![
      Detection {
        label_index: 2,
        label: "car".to_string(),
        confidence: 0.95,
      },
      Detection {
        label_index: 1,
        label: "bus".to_string(),
        confidence: 0.9,
      },
    ];
    let mut summary = DetectionSummary::new();
    summary.insert("car".to_string(), 1);
    summary.insert("bus".to_string(), 1);

    let text = format_detections(&retained, &summary);
    let bus_at = text.rfind("bus").unwrap();
    let car_at = text.rfind("car").unwrap();
    assert!(bus_at < car_at, "计数应按类别名排序:\n{}", text);
  }
}
