//! BitTorrent settings
//!
//! - [`record`]: the settings value object and its normalization rules
//! - [`locator`]: discovery of a previously used cache directory
//! - [`store`]: publication, persistence and startup restore

pub mod locator;
pub mod record;
pub mod store;

pub use locator::{CACHE_MARKER, LocatorHandle, locate_cache_dir};
pub use record::{BtSettings, RetrackersMode};
pub use store::{SetOutcome, SettingsStore};
