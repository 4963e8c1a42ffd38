//! The BitTorrent settings record
//!
//! A flat value object holding every tunable the torrent engine consumes.
//! Its JSON form uses the field names below verbatim; that document is what
//! gets persisted and what other components exchange.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lower bound of the reader read-ahead percentage
pub const MIN_READ_AHEAD: i32 = 5;
/// Upper bound of the reader read-ahead percentage
pub const MAX_READ_AHEAD: i32 = 100;
/// Lower bound of the preload percentage
pub const MIN_PRELOAD: i32 = 0;
/// Upper bound of the preload percentage
pub const MAX_PRELOAD: i32 = 100;

/// Policy for injecting retrackers into torrent metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum RetrackersMode {
    /// Leave the tracker list untouched
    #[default]
    DontAdd,
    /// Append retrackers to the tracker list
    Add,
    /// Strip retrackers from the tracker list
    Remove,
    /// Replace the tracker list with retrackers
    Replace,
}

impl TryFrom<i64> for RetrackersMode {
    type Error = String;

    fn try_from(value: i64) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::DontAdd),
            1 => Ok(Self::Add),
            2 => Ok(Self::Remove),
            3 => Ok(Self::Replace),
            other => Err(format!("unknown retrackers mode {}", other)),
        }
    }
}

impl From<RetrackersMode> for i64 {
    fn from(mode: RetrackersMode) -> Self {
        match mode {
            RetrackersMode::DontAdd => 0,
            RetrackersMode::Add => 1,
            RetrackersMode::Remove => 2,
            RetrackersMode::Replace => 3,
        }
    }
}

/// Runtime settings of the torrent engine
///
/// `Default` yields the zero record, which is also what absent JSON fields
/// decode to. The documented startup values come from [`BtSettings::baseline`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BtSettings {
    // Cache
    /// Maximum cache size in bytes
    #[serde(rename = "CacheSize")]
    pub cache_size: i64,
    /// Reader read-ahead in percent of the cache, 5..=100
    #[serde(rename = "ReaderReadAHead")]
    pub reader_read_ahead: i32,
    /// Preload in percent of the cache, 0..=100
    #[serde(rename = "PreloadCache")]
    pub preload_cache: i32,

    // Disk
    /// Keep the cache on disk instead of in memory
    #[serde(rename = "UseDisk")]
    pub use_disk: bool,
    /// Directory holding the disk cache
    #[serde(rename = "TorrentsSavePath")]
    pub torrents_save_path: String,
    /// Remove cached pieces when a torrent is dropped
    #[serde(rename = "RemoveCacheOnDrop")]
    pub remove_cache_on_drop: bool,

    // Torrent
    #[serde(rename = "ForceEncrypt")]
    pub force_encrypt: bool,
    #[serde(rename = "RetrackersMode")]
    pub retrackers_mode: RetrackersMode,
    /// Seconds of inactivity before a torrent is disconnected
    #[serde(rename = "TorrentDisconnectTimeout")]
    pub torrent_disconnect_timeout: i32,
    /// Verbose engine logging
    #[serde(rename = "EnableDebug")]
    pub enable_debug: bool,

    // DLNA
    #[serde(rename = "EnableDLNA")]
    pub enable_dlna: bool,

    // BT config
    #[serde(rename = "EnableIPv6")]
    pub enable_ipv6: bool,
    #[serde(rename = "DisableTCP")]
    pub disable_tcp: bool,
    #[serde(rename = "DisableUTP")]
    pub disable_utp: bool,
    #[serde(rename = "DisableUPNP")]
    pub disable_upnp: bool,
    #[serde(rename = "DisableDHT")]
    pub disable_dht: bool,
    #[serde(rename = "DisablePEX")]
    pub disable_pex: bool,
    #[serde(rename = "DisableUpload")]
    pub disable_upload: bool,
    /// Download rate limit in kb/s, 0 is unlimited
    #[serde(rename = "DownloadRateLimit")]
    pub download_rate_limit: i32,
    /// Upload rate limit in kb/s, 0 is unlimited
    #[serde(rename = "UploadRateLimit")]
    pub upload_rate_limit: i32,
    #[serde(rename = "ConnectionsLimit")]
    pub connections_limit: i32,
    #[serde(rename = "PeersListenPort")]
    pub peers_listen_port: i32,
}

impl BtSettings {
    /// Values used when nothing has been persisted yet
    pub fn baseline() -> Self {
        Self {
            cache_size: 64 * 1024 * 1024,
            reader_read_ahead: 95,
            preload_cache: 50,
            retrackers_mode: RetrackersMode::Add,
            torrent_disconnect_timeout: 30,
            connections_limit: 23,
            ..Self::default()
        }
    }

    /// Correct a candidate record in place
    ///
    /// Percentages saturate to their nearest bound and disk caching is turned
    /// off when there is no save path. Never fails.
    pub fn normalize(&mut self) {
        self.reader_read_ahead = self.reader_read_ahead.clamp(MIN_READ_AHEAD, MAX_READ_AHEAD);
        self.preload_cache = self.preload_cache.clamp(MIN_PRELOAD, MAX_PRELOAD);

        if self.torrents_save_path.is_empty() {
            self.use_disk = false;
        }
    }

    /// True when the locator should scan the save path
    pub fn wants_disk_cache(&self) -> bool {
        self.use_disk && !self.torrents_save_path.is_empty()
    }

    /// Cache size in whole mebibytes
    pub fn cache_size_mb(&self) -> i64 {
        self.cache_size / (1024 * 1024)
    }

    /// Download limit in bytes per second, `None` when unlimited
    pub fn download_limit_bytes(&self) -> Option<u64> {
        rate_limit_bytes(self.download_rate_limit)
    }

    /// Upload limit in bytes per second, `None` when unlimited
    pub fn upload_limit_bytes(&self) -> Option<u64> {
        rate_limit_bytes(self.upload_rate_limit)
    }
}

fn rate_limit_bytes(kb: i32) -> Option<u64> {
    // Negative limits are treated like 0
    u64::try_from(kb)
        .ok()
        .filter(|kb| *kb > 0)
        .map(|kb| kb * 1024)
}

impl fmt::Display for BtSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
