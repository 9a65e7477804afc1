// 该文件是 Guanwu （观物致知） 项目的一部分。
// src/model.rs - 推理提供者抽象
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

use serde::Deserialize;

/// 推理提供者：对输入产生原始模型输出的任意后端。
///
/// 解码与过滤逻辑只依赖该抽象的输出值，不关心推理引擎本身。
pub trait Model {
  type Input: ?Sized;
  type Output;
  type Error;

  fn infer(&self, input: &Self::Input) -> Result<Self::Output, Self::Error>;
}

/// 分类模型的原始输出：按类别顺序排列的未归一化分数。
pub type RawScores = Vec<f32>;

/// 检测模型的原始输出：三个并行序列，第 i 项对应同一个候选框。
///
/// `boxes` 仅随数据携带，本 crate 不解释框坐标。
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawDetections {
  #[serde(default)]
  pub boxes: Vec<[f32; 4]>,
  pub labels: Vec<u32>,
  pub scores: Vec<f32>,
}

mod replay;
pub use self::replay::{ReplayClassifier, ReplayDetector, ReplayError};
