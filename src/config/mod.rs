//! Process configuration management
//!
//! This module handles loading the configuration that tells the binary where
//! the settings store lives and how to log.

pub mod app;
pub mod loader;

pub use app::AppConfig;
pub use loader::ConfigLoader;

// Environment variable tests across this module must not interleave
#[cfg(test)]
pub(crate) static ENV_TEST_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
