use std::path::{Path, PathBuf};

use economy_core::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable that overrides the configured data file
pub const DATA_FILE_ENV: &str = "ECONOMY_DATA";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Snapshot file the book is loaded from and saved to
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    /// Default `env_logger` filter when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Balances created at startup
    #[serde(default)]
    pub accounts: Vec<AccountSeed>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSeed {
    pub id: AccountId,
    pub balance: Decimal,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("economy.data")
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            log_level: default_log_level(),
            accounts: Vec::new(),
        }
    }
}

impl CliConfig {
    /// Data file after applying an override such as `ECONOMY_DATA`
    pub fn data_file_with_override(&self, value: Option<String>) -> PathBuf {
        match value {
            Some(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => self.data_file.clone(),
        }
    }
}

/// Load CLI configuration from a JSON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CliConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: CliConfig = serde_json::from_str(&content)?;
    Ok(config)
}

/// Load configuration from a JSON string
pub fn load_config_from_str(json: &str) -> Result<CliConfig, ConfigError> {
    let config: CliConfig = serde_json::from_str(json)?;
    Ok(config)
}

/// Load the default embedded configuration
pub fn load_default_config() -> Result<CliConfig, ConfigError> {
    let default_config = include_str!("default_config.json");
    load_config_from_str(default_config)
}
