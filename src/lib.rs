//! Torrent Settings
//!
//! The settings core of a BitTorrent media server. It validates and
//! normalizes the engine's runtime options, persists them through an opaque
//! key/value store, restores them at startup and relocates the disk cache
//! when a previously used cache directory is found below the save path.
//!
//! # Architecture
//!
//! - [`btsets`]: the settings record, the cache directory locator and the
//!   store that owns the active record
//! - [`storage`]: the persistence adapter trait and its implementations
//! - [`config`]: process configuration (store location, read-only mode, logging)
//! - [`cli`]: the `tsets` command line front end
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use torrent_settings::{BtSettings, MemoryStore, SettingsStore};
//!
//! # tokio_test::block_on(async {
//! let store = SettingsStore::new(Arc::new(MemoryStore::new()));
//! store.load().await;
//!
//! let mut sets = BtSettings::clone(&store.current());
//! sets.reader_read_ahead = 250;
//! store.set(sets).await;
//!
//! assert_eq!(store.current().reader_read_ahead, 100);
//! # });
//! ```

pub mod btsets;
pub mod cli;
pub mod config;
pub mod error;
pub mod storage;

pub use btsets::{BtSettings, RetrackersMode, SetOutcome, SettingsStore};
pub use config::{AppConfig, ConfigLoader};
pub use error::{Error, Result};
pub use storage::{JsonFileStore, KvStore, MemoryStore};
