//! Configuration handling for schema reconciliation

use serde::{Deserialize, Serialize};
use std::fs;

use crate::error::{Error, Result};

/// Load configuration from a TOML file
pub fn load_from_file(path: &str) -> Result<Config> {
    let config_str = fs::read_to_string(path)
        .map_err(|e| Error::ConfigError(format!("Failed to read config file: {}", e)))?;

    let config: Config = toml::from_str(&config_str)
        .map_err(|e| Error::ConfigError(format!("Failed to parse config file: {}", e)))?;

    Ok(config)
}

/// Complete reconciler configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub reconcile: ReconcileConfig,
    pub logging: Option<LoggingConfig>,
}

/// Database connection configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub driver: String,
    pub url: String,
    pub pool_size: Option<u32>,
    pub timeout_seconds: Option<u64>,
}

/// Reconciliation behavior configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ReconcileConfig {
    /// Log every generated DDL statement without executing it.
    #[serde(default)]
    pub dry_run: bool,
    /// Keep applying remaining statements after one fails, instead of
    /// aborting the pass on first failure. Failures are reported either way.
    #[serde(default)]
    pub continue_on_error: bool,
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub stdout: bool,
    pub file: Option<String>,
}
