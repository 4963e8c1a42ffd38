//! Persistence adapters
//!
//! The settings store only needs an opaque namespace/key byte store. Two
//! implementations ship with the crate: an in-memory map and a JSON file.

pub mod file;
pub mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use crate::Result;
use async_trait::async_trait;

/// Namespace the settings record is stored under
pub const SETTINGS_NAMESPACE: &str = "Settings";
/// Key of the settings record inside [`SETTINGS_NAMESPACE`]
pub const SETTINGS_KEY: &str = "BitTorr";

/// Namespace/key byte store
#[async_trait]
pub trait KvStore: Send + Sync + std::fmt::Debug {
    /// Read a value, `None` when nothing was stored
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>>;

    /// Write a value, replacing any previous one
    async fn set(&self, namespace: &str, key: &str, value: Vec<u8>) -> Result<()>;
}
