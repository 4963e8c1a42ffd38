//! Configuration loading utilities
//!
//! Resolves the configuration file, applies environment overrides and
//! validates the result.

use crate::{Result, config::AppConfig};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Configuration loader with multiple source support
#[derive(Debug)]
pub struct ConfigLoader {
    /// Default configuration
    defaults: AppConfig,
}

impl ConfigLoader {
    /// Create new configuration loader
    pub fn new() -> Self {
        Self {
            defaults: AppConfig::default(),
        }
    }

    /// Get the config file path from TSETS_CONFIG or the default location
    ///
    /// Priority:
    /// 1. TSETS_CONFIG environment variable
    /// 2. ~/.config/torrent-settings/config.toml (or platform equivalent)
    pub fn get_config_path() -> Option<PathBuf> {
        if let Ok(config_path) = std::env::var("TSETS_CONFIG") {
            let path = PathBuf::from(config_path);
            if path.exists() {
                debug!("Using config file from TSETS_CONFIG: {:?}", path);
                return Some(path);
            } else {
                warn!("TSETS_CONFIG points to non-existent file: {:?}", path);
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let default_path = config_dir.join("torrent-settings").join("config.toml");
            if default_path.exists() {
                debug!("Using default config file: {:?}", default_path);
                return Some(default_path);
            }
        }

        debug!("No config file found");
        None
    }

    /// Load configuration with precedence order:
    /// 1. Environment variables
    /// 2. Configuration file
    /// 3. Default values
    ///
    /// Command line flags are applied on top by the caller.
    pub fn load(&self, config_file: Option<&Path>) -> Result<AppConfig> {
        let mut config = self.defaults.clone();

        if let Some(path) = config_file {
            if path.exists() {
                info!("Loading configuration from file: {:?}", path);
                config = AppConfig::from_file(path)?;
            } else {
                warn!("Configuration file not found: {:?}, using defaults", path);
            }
        }

        debug!("Applying environment variable overrides");
        config = config.merge_with_env()?;

        config.validate()?;

        debug!("Final configuration: {:?}", config);
        Ok(config)
    }

    /// Get default configuration
    pub fn defaults(&self) -> &AppConfig {
        &self.defaults
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
