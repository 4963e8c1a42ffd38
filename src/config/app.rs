//! Process configuration
//!
//! Settings that decide where the settings record lives and how the process
//! behaves, as opposed to the record itself. Loaded from a TOML file with
//! environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// Helper functions for serde defaults
fn default_store_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("torrent-settings")
        .join("settings.json")
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Persistence configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where and how the settings record is persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON store file
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
    /// Reject every settings update
    #[serde(default)]
    pub read_only: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable verbose logging
    #[serde(default)]
    pub verbose: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            read_only: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            verbose: false,
        }
    }
}

impl AppConfig {
    /// Create new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::Error::config("file", &format!("Failed to read config file: {}", e))
        })?;

        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn merge_with_env(mut self) -> crate::Result<Self> {
        if let Ok(path) = std::env::var("TSETS_STORE_PATH") {
            self.storage.path = PathBuf::from(path);
        }

        if let Ok(read_only) = std::env::var("TSETS_READ_ONLY") {
            self.storage.read_only = parse_flag(&read_only).ok_or_else(|| {
                crate::Error::config(
                    "TSETS_READ_ONLY",
                    &format!("Invalid boolean: {}", read_only),
                )
            })?;
        }

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(self)
    }

    /// Validate configuration values
    pub fn validate(&self) -> crate::Result<()> {
        if self.storage.path.as_os_str().is_empty() {
            return Err(crate::Error::config(
                "storage.path",
                "Store path cannot be empty",
            ));
        }

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(crate::Error::config(
                    "logging.level",
                    &format!("Invalid log level: {}", self.logging.level),
                ));
            }
        }

        Ok(())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
