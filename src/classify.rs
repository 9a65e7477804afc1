// 该文件是 Guanwu （观物致知） 项目的一部分。
// src/classify.rs - 分类输出解码
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

use thiserror::Error;

use crate::labels::{LabelMap, LabelMapError};

#[derive(Error, Debug)]
pub enum ClassifyError {
  #[error("输入分数序列为空")]
  EmptyInput,
  #[error("标签映射错误: {0}")]
  Label(#[from] LabelMapError),
}

/// Top-1 分类预测结果
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
  /// 类别名称
  pub label: String,
  /// 归一化后的概率，取值范围 [0, 1]
  pub confidence: f32,
}

/// 对一维 logits 做 softmax 归一化。
///
/// 先减去最大值再取指数，避免上溢。
pub fn softmax(logits: &[f32]) -> Vec<f32> {
  let max_val = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
  let exp_vals: Vec<f32> = logits.iter().map(|&x| (x - max_val).exp()).collect();
  let sum_exp: f32 = exp_vals.iter().sum();
  exp_vals.into_iter().map(|v| v / sum_exp).collect()
}

/// 最大值所在下标，相同取最小下标。
fn argmax(values: &[f32]) -> usize {
  let mut max_idx = 0;
  let mut max_val = f32::NEG_INFINITY;
  for (i, &val) in values.iter().enumerate() {
    if val > max_val {
      max_idx = i;
      max_val = val;
    }
  }
  max_idx
}

/// 解码分类模型的原始输出，返回概率最高的类别。
///
/// `raw_scores` 是每个类别一个的未归一化分数，类别顺序由模型约定。
pub fn decode_top1(raw_scores: &[f32], labels: &LabelMap) -> Result<Prediction, ClassifyError> {
  if raw_scores.is_empty() {
    return Err(ClassifyError::EmptyInput);
  }

  let probs = softmax(raw_scores);
  let index = argmax(&probs);
  let label = labels.lookup(index as u32)?.to_string();

  Ok(Prediction {
    label,
    confidence: probs[index],
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn cat_dog_bird() -> LabelMap {
    LabelMap::from_source("{0: 'cat', 1: 'dog', 2: 'bird'}").unwrap()
  }

  #[test]
  fn test_softmax_sums_to_one() {
    for logits in [
      vec![1.0f32, 5.0, 2.0],
      vec![0.0, 0.0, 0.0, 0.0],
      vec![-3.5, 10.0, 0.25, 7.5, -1.0],
      vec![1000.0, 1001.0, 999.0],
    ] {
      let probs = softmax(&logits);
      let sum: f32 = probs.iter().sum();
      assert!((sum - 1.0).abs() < 1e-6, "softmax 和为 {}", sum);
      assert!(probs.iter().all(|&p| (0.0..=1.0).contains(&p)));
    }
  }

  #[test]
  fn test_decode_top1_picks_highest() {
    let pred = decode_top1(&[1.0, 5.0, 2.0], &cat_dog_bird()).unwrap();
    assert_eq!(pred.label, "dog");
    assert!((pred.confidence - 0.936).abs() < 1e-3);
  }

  #[test]
  fn test_decode_top1_is_idempotent() {
    let labels = cat_dog_bird();
    let scores = [0.3, -1.2, 4.0];
    let first = decode_top1(&scores, &labels).unwrap();
    let second = decode_top1(&scores, &labels).unwrap();
    assert_eq!(first, second);
  }

  #[test]
  fn test_tie_broken_by_lowest_index() {
    let pred = decode_top1(&[2.0, 2.0, 1.0], &cat_dog_bird()).unwrap();
    assert_eq!(pred.label, "cat");
  }

  #[test]
  fn test_empty_scores_rejected() {
    assert!(matches!(
      decode_top1(&[], &cat_dog_bird()),
      Err(ClassifyError::EmptyInput)
    ));
  }

  #[test]
  fn test_index_outside_mapping_rejected() {
    // 分数覆盖的索引超出映射表时必须报错，不能退化为默认标签
    let labels = LabelMap::from_source("{0: 'cat'}").unwrap();
    assert!(matches!(
      decode_top1(&[0.0, 9.0], &labels),
      Err(ClassifyError::Label(LabelMapError::UnknownLabelIndex(1)))
    ));
  }
}
