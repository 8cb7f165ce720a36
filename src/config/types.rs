//! Core configuration types and loading.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::limits::{FloodConfig, IdleTimeoutsConfig, LimitsConfig};
use super::listen::ListenConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Server configuration.
///
/// Every section is optional; an empty file yields the stock service on
/// port 5050 logging to `server.log`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server identity.
    #[serde(default)]
    pub server: ServerConfig,
    /// Network listen configuration.
    #[serde(default)]
    pub listen: ListenConfig,
    /// Append-only chat log side channel.
    #[serde(default)]
    pub chat_log: ChatLogConfig,
    /// Line size and outbound queue limits.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Inbound flood protection.
    #[serde(default)]
    pub flood: FloodConfig,
    /// Negotiation and idle timeouts.
    #[serde(default)]
    pub idle_timeouts: IdleTimeoutsConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Server identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Name reported in logs (default: "linechat").
    #[serde(default = "default_server_name")]
    pub name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
        }
    }
}

fn default_server_name() -> String {
    "linechat".to_string()
}

/// Chat log side channel configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatLogConfig {
    /// Write the log at all (default: true).
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// File to append to (default: "server.log").
    #[serde(default = "default_chat_log_path")]
    pub path: PathBuf,
    /// Records buffered before new ones are dropped (default: 1024).
    #[serde(default = "default_chat_log_queue")]
    pub queue: usize,
}

impl Default for ChatLogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_chat_log_path(),
            queue: default_chat_log_queue(),
        }
    }
}

pub(super) fn default_true() -> bool {
    true
}

fn default_chat_log_path() -> PathBuf {
    PathBuf::from("server.log")
}

fn default_chat_log_queue() -> usize {
    1024
}
