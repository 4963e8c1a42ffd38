//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use torrent_settings::{BtSettings, MemoryStore, SettingsStore};

/// Test helper functions
pub mod helpers {
    use super::*;

    /// Store on a fresh in-memory backend
    pub fn memory_store() -> (SettingsStore, Arc<MemoryStore>) {
        let backend = Arc::new(MemoryStore::new());
        (SettingsStore::new(backend.clone()), backend)
    }

    /// Temporary directory whose own name is not hidden
    ///
    /// tempfile's default prefix starts with a dot, which the cache scan
    /// treats as a hidden directory.
    pub fn scratch_dir() -> TempDir {
        tempfile::Builder::new()
            .prefix("tsets-test")
            .tempdir()
            .unwrap()
    }

    pub fn mkdirs(root: &Path, rel: &str) -> PathBuf {
        let path = root.join(rel);
        std::fs::create_dir_all(&path).unwrap();
        path
    }
}

/// Settings factory
pub struct TestSettings;

impl TestSettings {
    /// Baseline record with every toggle flipped away from its default
    pub fn everything_set() -> BtSettings {
        BtSettings {
            cache_size: 200 * 1024 * 1024,
            reader_read_ahead: 80,
            preload_cache: 10,
            use_disk: false,
            torrents_save_path: String::new(),
            remove_cache_on_drop: true,
            force_encrypt: true,
            retrackers_mode: torrent_settings::RetrackersMode::Remove,
            torrent_disconnect_timeout: 120,
            enable_debug: true,
            enable_dlna: true,
            enable_ipv6: true,
            disable_tcp: true,
            disable_utp: true,
            disable_upnp: true,
            disable_dht: true,
            disable_pex: true,
            disable_upload: true,
            download_rate_limit: 4096,
            upload_rate_limit: 512,
            connections_limit: 50,
            peers_listen_port: 6881,
        }
    }

    /// Disk-backed record rooted at `path`
    pub fn on_disk(path: &Path) -> BtSettings {
        BtSettings {
            use_disk: true,
            torrents_save_path: path.to_string_lossy().into_owned(),
            ..BtSettings::baseline()
        }
    }
}

/// Shared buffer collecting formatted log output
#[derive(Clone, Default)]
pub struct LogCapture {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Install a capturing subscriber for the current thread
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let capture = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_ansi(false)
            .with_writer(move || capture.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        let buf = self.buf.lock().unwrap();
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl Write for LogCapture {
    fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
