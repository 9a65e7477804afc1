// 该文件是 Guanwu （观物致知） 项目的一部分。
// src/detect.rs - 检测输出过滤与聚合
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

use std::collections::HashMap;

use thiserror::Error;
use tracing::warn;

use crate::labels::{LabelMap, LabelMapError};

#[derive(Error, Debug)]
pub enum DetectError {
  #[error("类别索引与置信度序列长度不一致: {indices} 对 {scores}")]
  LengthMismatch { indices: usize, scores: usize },
  #[error("标签映射错误: {0}")]
  Label(#[from] LabelMapError),
}

/// 保留下来的单个检测结果
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
  /// 类别索引
  pub label_index: u32,
  /// 类别名称
  pub label: String,
  /// 置信度
  pub confidence: f32,
}

/// 类别名称到出现次数的统计
pub type DetectionSummary = HashMap<String, usize>;

/// 按置信度阈值过滤检测候选，并按类别统计保留数量。
///
/// `label_indices` 与 `scores` 是并行序列，第 i 项对应同一个候选框。
/// 只有 `score > threshold` 的候选被保留（等于阈值的丢弃），
/// 保留列表维持输入顺序。`threshold` 取值范围 [0, 1]。
///
/// 类别索引只对保留下来的候选做映射表校验；被丢弃的候选即使索引
/// 不在映射表中也不会使调用失败，只记录一条警告日志。
pub fn filter_and_count(
  label_indices: &[u32],
  scores: &[f32],
  labels: &LabelMap,
  threshold: f32,
) -> Result<(Vec<Detection>, DetectionSummary), DetectError> {
  if label_indices.len() != scores.len() {
    return Err(DetectError::LengthMismatch {
      indices: label_indices.len(),
      scores: scores.len(),
    });
  }

  let mut retained = Vec::new();
  for (&index, &score) in label_indices.iter().zip(scores.iter()) {
    if score > threshold {
      let label = labels.lookup(index)?.to_string();
      retained.push(Detection {
        label_index: index,
        label,
        confidence: score,
      });
    } else if !labels.contains(index) {
      warn!(
        "被丢弃的候选框引用了未知类别索引 {} (置信度 {:.4})",
        index, score
      );
    }
  }

  let mut summary = DetectionSummary::new();
  for detection in &retained {
    *summary.entry(detection.label.clone()).or_insert(0) += 1;
  }

  Ok((retained, summary))
}
