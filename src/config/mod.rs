use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Log configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LogConfig {
  /// Log file path, if not set, logs will be printed to stdout
  pub file: Option<String>,
  /// Log level, default is "info"
  #[serde(default = "default_log_level")]
  pub level: String,
}

fn default_log_level() -> String {
  "info".to_string()
}

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      file: None,
      level: default_log_level(),
    }
  }
}

/// Box server configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
  /// HTTP listening address
  #[serde(default = "default_server_addr")]
  pub server_addr: String,

  /// JSON file holding the box collection
  #[serde(default = "default_data_file")]
  pub data_file: PathBuf,

  /// Port clients are redirected to for HTTPS, redirection is off if unset
  #[serde(default)]
  pub https_port: Option<u16>,

  /// Log configuration
  #[serde(default)]
  pub log: LogConfig,
}

fn default_server_addr() -> String {
  "0.0.0.0:5000".to_string()
}

fn default_data_file() -> PathBuf {
  PathBuf::from("boxes.json")
}

impl Default for Config {
  fn default() -> Self {
    Self {
      server_addr: default_server_addr(),
      data_file: default_data_file(),
      https_port: None,
      log: LogConfig::default(),
    }
  }
}

impl Config {
  /// Load configuration from TOML file
  pub fn from_file(path: &str) -> anyhow::Result<Self> {
    let config_str = fs::read_to_string(path)
      .with_context(|| format!("Failed to read config file '{}'", path))?;

    let config: Config = toml::from_str(&config_str)
      .with_context(|| format!("Failed to parse config file '{}'", path))?;

    Ok(config)
  }
}
