// 该文件是 Guanwu （观物致知） 项目的一部分。
// src/source.rs - 映射文本来源
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
use tracing::{error, info};
use url::Url;

use crate::FromUrl;

#[derive(Error, Debug)]
pub enum SourceError {
  #[error("URI scheme mismatch: '{0}'")]
  SchemeMismatch(String),
  #[error("I/O error: {0}")]
  IoError(#[from] std::io::Error),
  #[cfg(feature = "https_source")]
  #[error("HTTP error: {0}")]
  HttpError(#[from] Box<ureq::Error>),
}

/// 标签映射来源文本。
///
/// 来源只负责取回文本，内容交由 `LabelMap::from_source` 解析。
pub struct TextSource {
  text: String,
}

impl FromUrl for TextSource {
  type Error = SourceError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    let text = match url.scheme() {
      "file" => {
        info!("读取映射文件: {}", url.path());
        std::fs::read_to_string(url.path())?
      }
      #[cfg(feature = "https_source")]
      "http" | "https" => {
        info!("下载映射文本: {}", url);
        ureq::get(url.as_str())
          .call()
          .map_err(Box::new)?
          .into_string()?
      }
      other => {
        error!("不支持的映射来源方案: '{}'", other);
        return Err(SourceError::SchemeMismatch(other.to_string()));
      }
    };

    Ok(TextSource { text })
  }
}

impl TextSource {
  pub fn text(&self) -> &str {
    &self.text
  }

  pub fn into_text(self) -> String {
    self.text
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;

  #[test]
  fn test_file_scheme_reads_text() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{0: 'cat'}}").unwrap();
    let url = Url::from_file_path(file.path()).unwrap();

    let source = TextSource::from_url(&url).unwrap();
    assert_eq!(source.text(), "{0: 'cat'}");
  }

  #[test]
  fn test_unknown_scheme_rejected() {
    let url = Url::parse("ftp://example.com/labels.txt").unwrap();
    assert!(matches!(
      TextSource::from_url(&url),
      Err(SourceError::SchemeMismatch(_))
    ));
  }

  #[test]
  fn test_missing_file_is_io_error() {
    let url = Url::parse("file:///no/such/guanwu/labels.txt").unwrap();
    assert!(matches!(
      TextSource::from_url(&url),
      Err(SourceError::IoError(_))
    ));
  }
}
