// 该文件是 Guanwu （观物致知） 项目的一部分。
// src/model/replay.rs - 录制输出回放模型
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
use tracing::{debug, info};
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  model::{Model, RawDetections, RawScores},
};

const REPLAY_SCHEME: &str = "replay";

#[derive(Error, Debug)]
pub enum ReplayError {
  #[error("回放转储路径错误: {0}")]
  DumpPathError(String),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("回放转储解析错误: {0}")]
  JsonError(#[from] serde_json::Error),
  #[error("回放转储中没有输入 '{0}' 对应的记录")]
  MissingEntry(String),
}

/// 分类模型的回放实现。
///
/// 转储文件是一个 JSON 对象，键为输入图像标识，值为该图像一次
/// 前向计算的原始分数序列:
///
/// ```text
/// { "image.png": [1.0, 5.0, 2.0] }
/// ```
pub struct ReplayClassifier {
  outputs: HashMap<String, RawScores>,
}

impl ReplayClassifier {
  pub fn from_json(text: &str) -> Result<Self, ReplayError> {
    let outputs: HashMap<String, RawScores> = serde_json::from_str(text)?;
    debug!("分类回放转储包含 {} 条记录", outputs.len());
    Ok(ReplayClassifier { outputs })
  }
}

impl FromUrl for ReplayClassifier {
  type Error = ReplayError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    let path = check_scheme(url)?;
    info!("加载分类回放转储: {}", path);
    let text = std::fs::read_to_string(path)?;
    Self::from_json(&text)
  }
}

impl FromUrlWithScheme for ReplayClassifier {
  const SCHEME: &'static str = REPLAY_SCHEME;
}

impl Model for ReplayClassifier {
  type Input = str;
  type Output = RawScores;
  type Error = ReplayError;

  fn infer(&self, input: &str) -> Result<RawScores, ReplayError> {
    self
      .outputs
      .get(input)
      .cloned()
      .ok_or_else(|| ReplayError::MissingEntry(input.to_string()))
  }
}

/// 检测模型的回放实现。
///
/// 转储文件的值为并行的 `boxes` / `labels` / `scores` 序列，
/// `boxes` 可以省略:
///
/// ```text
/// { "street.jpg": { "labels": [1, 2, 1], "scores": [0.9, 0.5, 0.86] } }
/// ```
pub struct ReplayDetector {
  outputs: HashMap<String, RawDetections>,
}

impl ReplayDetector {
  pub fn from_json(text: &str) -> Result<Self, ReplayError> {
    let outputs: HashMap<String, RawDetections> = serde_json::from_str(text)?;
    debug!("检测回放转储包含 {} 条记录", outputs.len());
    Ok(ReplayDetector { outputs })
  }
}

impl FromUrl for ReplayDetector {
  type Error = ReplayError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    let path = check_scheme(url)?;
    info!("加载检测回放转储: {}", path);
    let text = std::fs::read_to_string(path)?;
    Self::from_json(&text)
  }
}

impl FromUrlWithScheme for ReplayDetector {
  const SCHEME: &'static str = REPLAY_SCHEME;
}

impl Model for ReplayDetector {
  type Input = str;
  type Output = RawDetections;
  type Error = ReplayError;

  fn infer(&self, input: &str) -> Result<RawDetections, ReplayError> {
    self
      .outputs
      .get(input)
      .cloned()
      .ok_or_else(|| ReplayError::MissingEntry(input.to_string()))
  }
}

fn check_scheme(url: &Url) -> Result<&str, ReplayError> {
  if url.scheme() != REPLAY_SCHEME {
    return Err(ReplayError::DumpPathError(format!(
      "转储路径必须使用 {} 方案",
      REPLAY_SCHEME
    )));
  }
  Ok(url.path())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_classifier_replay_known_and_unknown_key() {
    let replay =
      ReplayClassifier::from_json(r#"{"image.png": [1.0, 5.0, 2.0]}"#).unwrap();
    assert_eq!(replay.infer("image.png").unwrap(), vec![1.0, 5.0, 2.0]);
    assert!(matches!(
      replay.infer("missing.png"),
      Err(ReplayError::MissingEntry(_))
    ));
  }

  #[test]
  fn test_detector_replay_boxes_optional() {
    let replay = ReplayDetector::from_json(
      r#"{"street.jpg": {"labels": [1, 2], "scores": [0.9, 0.5]}}"#,
    )
    .unwrap();
    let raw = replay.infer("street.jpg").unwrap();
    assert!(raw.boxes.is_empty());
    assert_eq!(raw.labels, vec![1, 2]);
    assert_eq!(raw.scores, vec![0.9, 0.5]);
  }

  #[test]
  fn test_detector_replay_carries_boxes() {
    let replay = ReplayDetector::from_json(
      r#"{"street.jpg": {"boxes": [[0.0, 0.0, 10.0, 10.0]], "labels": [1], "scores": [0.9]}}"#,
    )
    .unwrap();
    let raw = replay.infer("street.jpg").unwrap();
    assert_eq!(raw.boxes, vec![[0.0, 0.0, 10.0, 10.0]]);
  }

  #[test]
  fn test_malformed_dump_rejected() {
    assert!(matches!(
      ReplayClassifier::from_json("not json"),
      Err(ReplayError::JsonError(_))
    ));
  }

  #[test]
  fn test_url_scheme_checked() {
    let url = Url::parse("file:///tmp/dump.json").unwrap();
    assert!(matches!(
      ReplayClassifier::from_url(&url),
      Err(ReplayError::DumpPathError(_))
    ));
  }
}
