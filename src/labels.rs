// 该文件是 Guanwu （观物致知） 项目的一部分。
// src/labels.rs - 类别标签映射
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

#[derive(Error, Debug)]
pub enum LabelMapError {
  #[error("标签映射文本解析失败 (第 {line} 行): {reason}")]
  MappingParse { line: usize, reason: String },
  #[error("未知的类别索引: {0}")]
  UnknownLabelIndex(u32),
}

/// 类别索引到标签名的映射表。
///
/// 从映射字面量文本构造一次，之后只读。缺失的索引在查询时报错，
/// 不会退化为默认标签：索引缺失说明模型与映射表版本不一致。
#[derive(Debug, Clone)]
pub struct LabelMap {
  entries: HashMap<u32, String>,
}

impl LabelMap {
  /// 从映射字面量文本构造映射表。
  ///
  /// 接受 Python 风格的字典字面量，键为非负整数或可转换为
  /// 非负整数的带引号字符串:
  ///
  /// ```text
  /// {0: 'tench, Tinca tinca', 1: "goldfish"}
  /// {'1': 'person', '2': 'bicycle',}
  /// ```
  pub fn from_source(text: &str) -> Result<Self, LabelMapError> {
    let entries = parse_mapping_literal(text)?;
    Ok(LabelMap { entries })
  }

  /// 按类别索引查询标签名。
  pub fn lookup(&self, index: u32) -> Result<&str, LabelMapError> {
    self
      .entries
      .get(&index)
      .map(String::as_str)
      .ok_or(LabelMapError::UnknownLabelIndex(index))
  }

  pub fn contains(&self, index: u32) -> bool {
    self.entries.contains_key(&index)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

struct Parser<'a> {
  input: std::iter::Peekable<std::str::Chars<'a>>,
  line: usize,
}

impl<'a> Parser<'a> {
  fn new(text: &'a str) -> Self {
    Parser {
      input: text.chars().peekable(),
      line: 1,
    }
  }

  fn peek(&mut self) -> Option<char> {
    self.input.peek().copied()
  }

  fn bump(&mut self) -> Option<char> {
    let c = self.input.next();
    if c == Some('\n') {
      self.line += 1;
    }
    c
  }

  fn skip_ws(&mut self) {
    while matches!(self.peek(), Some(c) if c.is_whitespace()) {
      self.bump();
    }
  }

  fn fail(&self, reason: impl Into<String>) -> LabelMapError {
    LabelMapError::MappingParse {
      line: self.line,
      reason: reason.into(),
    }
  }

  fn expect(&mut self, want: char) -> Result<(), LabelMapError> {
    match self.bump() {
      Some(c) if c == want => Ok(()),
      Some(c) => Err(self.fail(format!("期望 '{}', 读到 '{}'", want, c))),
      None => Err(self.fail(format!("期望 '{}', 但文本已结束", want))),
    }
  }

  /// 键: 裸整数或带引号的整数字符串，必须为非负。
  fn parse_index(&mut self) -> Result<u32, LabelMapError> {
    match self.peek() {
      Some('\'' | '"') => {
        let raw = self.parse_string()?;
        raw
          .trim()
          .parse::<u32>()
          .map_err(|_| self.fail(format!("键 '{}' 不是非负整数", raw)))
      }
      Some(c) if c.is_ascii_digit() => {
        let mut raw = String::new();
        while let Some(c) = self.peek() {
          if !c.is_ascii_digit() {
            break;
          }
          raw.push(c);
          self.bump();
        }
        raw
          .parse::<u32>()
          .map_err(|_| self.fail(format!("键 '{}' 超出索引范围", raw)))
      }
      Some(c) => Err(self.fail(format!("期望整数键, 读到 '{}'", c))),
      None => Err(self.fail("期望整数键, 但文本已结束")),
    }
  }

  fn parse_string(&mut self) -> Result<String, LabelMapError> {
    let quote = match self.bump() {
      Some(c @ ('\'' | '"')) => c,
      Some(c) => return Err(self.fail(format!("期望字符串, 读到 '{}'", c))),
      None => return Err(self.fail("期望字符串, 但文本已结束")),
    };

    let mut out = String::new();
    loop {
      match self.bump() {
        None => return Err(self.fail("字符串未闭合")),
        Some(c) if c == quote => return Ok(out),
        Some('\\') => match self.bump() {
          None => return Err(self.fail("字符串未闭合")),
          Some('n') => out.push('\n'),
          Some('t') => out.push('\t'),
          // \' \" \\ 等转义原样保留
          Some(c) => out.push(c),
        },
        Some(c) => out.push(c),
      }
    }
  }
}

fn parse_mapping_literal(text: &str) -> Result<HashMap<u32, String>, LabelMapError> {
  let mut p = Parser::new(text);
  let mut entries = HashMap::new();

  p.skip_ws();
  p.expect('{')?;
  p.skip_ws();

  if p.peek() == Some('}') {
    p.bump();
  } else {
    loop {
      let key = p.parse_index()?;
      p.skip_ws();
      p.expect(':')?;
      p.skip_ws();
      let value = p.parse_string()?;
      if entries.insert(key, value).is_some() {
        return Err(p.fail(format!("键 {} 重复出现", key)));
      }
      p.skip_ws();
      match p.bump() {
        Some(',') => {
          p.skip_ws();
          // Python 允许末尾逗号
          if p.peek() == Some('}') {
            p.bump();
            break;
          }
        }
        Some('}') => break,
        Some(c) => return Err(p.fail(format!("期望 ',' 或 '}}', 读到 '{}'", c))),
        None => return Err(p.fail("映射未以 '}' 结束")),
      }
    }
  }

  p.skip_ws();
  if let Some(c) = p.peek() {
    return Err(p.fail(format!("映射结束后存在多余内容: '{}'", c)));
  }

  Ok(entries)
}
