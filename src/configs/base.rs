use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bilibili::{SessionCredential, VideoId};
use crate::common::types::AnyResult;
use crate::configs::*;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
  #[serde(default)]
  pub bilibili: BilibiliConfig,
  #[serde(default)]
  pub output: OutputConfig,
  #[serde(default)]
  pub http: HttpConfig,
  pub logging: Option<LoggingConfig>,
}

impl Config {
  /// `config.toml` if present, else `config.default.toml`.
  pub fn find() -> Option<&'static Path> {
    ["config.toml", "config.default.toml"]
      .into_iter()
      .map(Path::new)
      .find(|p| p.exists())
  }

  pub fn load_from(path: &Path) -> AnyResult<Self> {
    let config_str = std::fs::read_to_string(path)
      .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    if config_str.trim().is_empty() {
      return Err(format!("{} is empty", path.display()).into());
    }

    Self::parse(&config_str)
  }

  pub fn parse(config_str: &str) -> AnyResult<Self> {
    let config: Config = toml::from_str(config_str)?;
    Ok(config)
  }

  /// Returns the session credential and video id, rejecting blank values.
  pub fn validate(&self) -> AnyResult<(SessionCredential, VideoId)> {
    let sessdata = non_blank(self.bilibili.sessdata.as_deref())
      .ok_or("sessdata not found or empty (set [bilibili] sessdata or pass it on the command line)")?;
    let video_id = non_blank(self.bilibili.video_id.as_deref())
      .ok_or("video_id not found or empty (set [bilibili] video_id or pass it on the command line)")?;

    if sessdata.chars().any(char::is_control) {
      return Err("sessdata contains control characters".into());
    }

    Ok((SessionCredential::new(sessdata), VideoId::from(video_id)))
  }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
  value.map(str::trim).filter(|v| !v.is_empty())
}
