//! Runtime configuration: an optional TOML file overlaid by `FRONTDESK_*`
//! environment variables.

use std::path::{Path, PathBuf};

use frontdesk_notify::NotifyConfig;
use serde::Deserialize;

/// Runtime server configuration.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
  /// Directory holding `mensajes.json` and `reservaciones.json`.
  #[serde(default = "default_backup_dir")]
  pub backup_dir: PathBuf,
  #[serde(default)]
  pub notify:     NotifyConfig,
}

impl ServerConfig {
  /// Read `path` (if it exists), then apply environment overrides such as
  /// `FRONTDESK_PORT=8080` or `FRONTDESK_NOTIFY__API_KEY=re_...`.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("FRONTDESK")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

fn default_host() -> String { "0.0.0.0".to_owned() }

fn default_port() -> u16 { 3000 }

fn default_store_path() -> PathBuf { PathBuf::from("frontdesk.db") }

fn default_backup_dir() -> PathBuf { PathBuf::from(".") }

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
