//! Command line front end
//!
//! Shared setup for every subcommand: configuration loading, logging and
//! opening the settings store.

pub mod commands;

use crate::btsets::SettingsStore;
use crate::config::{AppConfig, ConfigLoader};
use crate::storage::JsonFileStore;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Options shared by all subcommands
#[derive(Debug, Clone, Default)]
pub struct GlobalArgs {
    pub config: Option<PathBuf>,
    pub store: Option<PathBuf>,
    pub read_only: bool,
    pub verbose: bool,
}

/// Resolve configuration and initialize logging
///
/// Configuration precedence:
/// 1. Command line arguments (highest priority)
/// 2. Environment variables
/// 3. Configuration file (from --config, TSETS_CONFIG or default location)
/// 4. Default values (lowest priority)
///
/// A configuration that cannot be loaded is an error, never a fallback to
/// the defaults.
pub fn setup(args: &GlobalArgs) -> Result<AppConfig> {
    let config = resolve_config(args)?;
    init_logging(&config);
    Ok(config)
}

/// Like [`setup`], then open the settings store
pub fn prepare(args: &GlobalArgs) -> Result<(AppConfig, SettingsStore)> {
    let config = setup(args)?;

    let backend = Arc::new(JsonFileStore::new(config.storage.path.clone()));
    let store = SettingsStore::new(backend).with_read_only(config.storage.read_only);
    tracing::debug!("Settings store at {:?}", config.storage.path);

    Ok((config, store))
}

fn resolve_config(args: &GlobalArgs) -> Result<AppConfig> {
    let config_path = args.config.clone().or_else(ConfigLoader::get_config_path);

    let mut config = ConfigLoader::new()
        .load(config_path.as_deref())
        .context("loading configuration")?;

    if let Some(store) = &args.store {
        config.storage.path = store.clone();
    }
    if args.read_only {
        config.storage.read_only = true;
    }
    if args.verbose {
        config.logging.verbose = true;
    }

    Ok(config)
}

/// Install the global subscriber
///
/// Level precedence: verbose flag, then RUST_LOG, then the configured level.
/// Logs go to stderr so stdout stays machine readable.
fn init_logging(config: &AppConfig) {
    let env_filter = if config.logging.verbose {
        EnvFilter::new("debug")
    } else if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(&config.logging.level)
    };

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
