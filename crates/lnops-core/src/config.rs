use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Toolkit configuration, stored as TOML (default location
/// `~/.lnops/config.toml`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LnopsConfig {
    /// Address (host:port) of the Eclair REST API.
    pub api_url: String,
    /// Password for the API (user is always "eclair-cli").
    pub api_password: String,
    /// Interval between payment-status polls, in milliseconds.
    pub poll_interval_ms: u64,
    /// Maximum number of status polls before giving up on a payment.
    pub poll_attempts: u32,
}

impl Default for LnopsConfig {
    fn default() -> Self {
        Self {
            api_url: "127.0.0.1:8080".into(),
            api_password: String::new(),
            poll_interval_ms: 500,
            poll_attempts: 100,
        }
    }
}

impl LnopsConfig {
    /// Read a config file. Missing file is an error; callers that want a
    /// default should check existence first.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Write the config as TOML, creating parent directories as needed.
    pub fn store(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)?;
        std::fs::write(path, raw)?;
        Ok(())
    }
}
