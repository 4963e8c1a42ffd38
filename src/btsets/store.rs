//! Settings store
//!
//! Owns the active [`BtSettings`] and mediates every change to it: candidate
//! records are normalized, published, persisted through a [`KvStore`], and
//! restored from it at startup.
//!
//! ## Consistency
//!
//! Publishing is a pointer swap behind a lock, so readers always get a
//! complete snapshot. When disk caching is enabled a background scan may
//! later swap in a copy with a corrected save path. That correction is not
//! written back, so the persisted record can lag the active one until the
//! next [`SettingsStore::set`].

use crate::btsets::locator::{LocatorHandle, spawn_locator};
use crate::btsets::record::{BtSettings, MAX_READ_AHEAD, MIN_READ_AHEAD};
use crate::storage::{KvStore, SETTINGS_KEY, SETTINGS_NAMESPACE};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, Weak};
use tracing::{debug, error, info, warn};

type Slot = RwLock<Option<Arc<BtSettings>>>;

/// What a [`SettingsStore::set`] call did
///
/// Callers are free to ignore it; failures have already been logged.
#[derive(Debug)]
pub struct SetOutcome {
    /// False when the store is read-only and the call was dropped
    pub applied: bool,
    /// True when the record reached the persistence adapter
    pub persisted: bool,
    /// Cache directory scan started for this record, if any
    pub locator: Option<LocatorHandle>,
}

impl SetOutcome {
    fn ignored() -> Self {
        Self {
            applied: false,
            persisted: false,
            locator: None,
        }
    }
}

/// Holder of the active settings record
#[derive(Debug)]
pub struct SettingsStore {
    active: Arc<Slot>,
    backend: Arc<dyn KvStore>,
    read_only: AtomicBool,
}

impl SettingsStore {
    /// Create an uninitialized store on top of `backend`
    pub fn new(backend: Arc<dyn KvStore>) -> Self {
        Self {
            active: Arc::new(RwLock::new(None)),
            backend,
            read_only: AtomicBool::new(false),
        }
    }

    /// Builder variant setting the read-only gate
    pub fn with_read_only(self, read_only: bool) -> Self {
        self.set_read_only(read_only);
        self
    }

    pub fn read_only(&self) -> bool {
        self.read_only.load(Ordering::SeqCst)
    }

    /// While set, [`SettingsStore::set`] is a no-op
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    /// True once a record has been published
    pub fn is_initialized(&self) -> bool {
        read_slot(&self.active).is_some()
    }

    /// Snapshot of the active record
    ///
    /// Falls back to [`BtSettings::baseline`] before anything was published.
    pub fn current(&self) -> Arc<BtSettings> {
        read_slot(&self.active).unwrap_or_else(|| Arc::new(BtSettings::baseline()))
    }

    /// Validate, publish and persist a candidate record
    ///
    /// Never fails from the caller's point of view. Read-only mode turns the
    /// call into a no-op, a scan for a cache marker is started when disk
    /// caching is enabled, and persistence errors are only logged.
    pub async fn set(&self, mut candidate: BtSettings) -> SetOutcome {
        if self.read_only() {
            debug!("Settings are read-only, ignoring update");
            return SetOutcome::ignored();
        }

        candidate.normalize();

        let published = Arc::new(candidate);
        publish(&self.active, published.clone());

        let locator = if published.wants_disk_cache() {
            Some(self.launch_locator(&published))
        } else {
            None
        };

        let persisted = self.persist(&published).await;

        SetOutcome {
            applied: true,
            persisted,
            locator,
        }
    }

    /// Restore the persisted record, or fall back to the defaults
    ///
    /// Only the read-ahead percentage is re-validated. The preload percentage
    /// is trusted as stored.
    pub async fn load(&self) {
        let bytes = match self.backend.get(SETTINGS_NAMESPACE, SETTINGS_KEY).await {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(category = e.category(), "Error read btsets: {}", e);
                None
            }
        };

        if let Some(bytes) = bytes.filter(|b| !b.is_empty()) {
            match serde_json::from_slice::<BtSettings>(&bytes) {
                Ok(mut sets) => {
                    sets.reader_read_ahead =
                        sets.reader_read_ahead.clamp(MIN_READ_AHEAD, MAX_READ_AHEAD);
                    debug!("Loaded btsets: {}", sets);
                    publish(&self.active, Arc::new(sets));
                    return;
                }
                Err(e) => error!("Error unmarshal btsets: {}", e),
            }
        }

        self.set_default();
    }

    /// Publish the built-in defaults without persisting them
    pub fn set_default(&self) {
        debug!("Using default btsets");
        publish(&self.active, Arc::new(BtSettings::baseline()));
    }

    fn launch_locator(&self, published: &Arc<BtSettings>) -> LocatorHandle {
        let root = PathBuf::from(&published.torrents_save_path);
        let slot: Weak<Slot> = Arc::downgrade(&self.active);
        let launched = Arc::downgrade(published);

        spawn_locator(root, move |found| {
            let Some(slot) = slot.upgrade() else {
                return;
            };
            adopt_cache_dir(&slot, &launched, found);
        })
    }

    async fn persist(&self, sets: &BtSettings) -> bool {
        let buf = match serde_json::to_vec(sets) {
            Ok(buf) => buf,
            Err(e) => {
                error!("Error marshal btsets: {}", e);
                return false;
            }
        };

        match self.backend.set(SETTINGS_NAMESPACE, SETTINGS_KEY, buf).await {
            Ok(()) => true,
            Err(e) => {
                error!(category = e.category(), "Error write btsets: {}", e);
                false
            }
        }
    }
}

/// Swap in a copy of the active record pointing at `found`
///
/// Only applies while the record the scan was started for is still active,
/// so a slow scan cannot undo a newer update.
fn adopt_cache_dir(slot: &Slot, launched: &Weak<BtSettings>, found: PathBuf) {
    let mut guard = match slot.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };

    let current = match (guard.as_ref(), launched.upgrade()) {
        (Some(current), Some(launched)) if Arc::ptr_eq(current, &launched) => current,
        _ => {
            warn!("Settings changed during cache scan, ignoring {:?}", found);
            return;
        }
    };

    let mut updated = BtSettings::clone(current);
    updated.torrents_save_path = found.to_string_lossy().into_owned();
    info!("Cache dir set to {:?}", updated.torrents_save_path);
    *guard = Some(Arc::new(updated));
}

fn publish(slot: &Slot, sets: Arc<BtSettings>) {
    let mut guard = match slot.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    *guard = Some(sets);
}

fn read_slot(slot: &Slot) -> Option<Arc<BtSettings>> {
    match slot.read() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::btsets::record::RetrackersMode;
    use crate::storage::MemoryStore;
    use pretty_assertions::assert_eq;

    fn store_with_backend() -> (SettingsStore, Arc<MemoryStore>) {
        let backend = Arc::new(MemoryStore::new());
        (SettingsStore::new(backend.clone()), backend)
    }

    #[tokio::test]
    async fn test_uninitialized_store_reports_baseline() {
        let (store, _) = store_with_backend();
        assert!(!store.is_initialized());
        assert_eq!(*store.current(), BtSettings::baseline());
    }

    #[tokio::test]
    async fn test_set_normalizes_and_persists() {
        let (store, backend) = store_with_backend();
        let candidate = BtSettings {
            reader_read_ahead: 1,
            preload_cache: 120,
            use_disk: true,
            ..BtSettings::baseline()
        };

        let outcome = store.set(candidate).await;
        assert!(outcome.applied);
        assert!(outcome.persisted);
        assert!(outcome.locator.is_none());

        let active = store.current();
        assert_eq!(active.reader_read_ahead, 5);
        assert_eq!(active.preload_cache, 100);
        assert!(!active.use_disk);

        let bytes = backend.get("Settings", "BitTorr").await.unwrap().unwrap();
        let stored: BtSettings = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(stored, *active);
    }

    #[tokio::test]
    async fn test_read_only_set_is_ignored() {
        let (store, backend) = store_with_backend();
        store.set_default();
        let before = store.current();

        store.set_read_only(true);
        let outcome = store
            .set(BtSettings {
                connections_limit: 99,
                ..BtSettings::baseline()
            })
            .await;

        assert!(!outcome.applied);
        assert!(Arc::ptr_eq(&before, &store.current()));
        assert_eq!(backend.write_count(), 0);
    }

    #[tokio::test]
    async fn test_load_without_data_uses_defaults() {
        let (store, backend) = store_with_backend();
        store.load().await;

        assert!(store.is_initialized());
        assert_eq!(*store.current(), BtSettings::baseline());
        assert_eq!(backend.write_count(), 0);
    }

    #[tokio::test]
    async fn test_load_corrupt_data_uses_defaults() {
        let (store, backend) = store_with_backend();
        backend
            .set("Settings", "BitTorr", b"{not json".to_vec())
            .await
            .unwrap();

        store.load().await;
        assert_eq!(*store.current(), BtSettings::baseline());
    }

    #[tokio::test]
    async fn test_load_json_null_uses_defaults() {
        let (store, backend) = store_with_backend();
        backend
            .set("Settings", "BitTorr", b"null".to_vec())
            .await
            .unwrap();

        store.load().await;
        assert_eq!(*store.current(), BtSettings::baseline());
    }

    #[tokio::test]
    async fn test_load_clamps_read_ahead_only() {
        let (store, backend) = store_with_backend();
        backend
            .set(
                "Settings",
                "BitTorr",
                br#"{"ReaderReadAHead": 2, "PreloadCache": 250, "RetrackersMode": 3}"#.to_vec(),
            )
            .await
            .unwrap();

        store.load().await;
        let active = store.current();
        assert_eq!(active.reader_read_ahead, 5);
        // Persisted preload is trusted as-is
        assert_eq!(active.preload_cache, 250);
        assert_eq!(active.retrackers_mode, RetrackersMode::Replace);
        assert_eq!(active.cache_size, 0);
    }

    #[tokio::test]
    async fn test_set_default_is_not_persisted() {
        let (store, backend) = store_with_backend();
        store.set_default();
        assert_eq!(backend.write_count(), 0);
        assert_eq!(backend.get("Settings", "BitTorr").await.unwrap(), None);
    }

    #[test]
    fn test_stale_scan_does_not_override_newer_record() {
        let slot: Slot = RwLock::new(None);
        let launched = Arc::new(BtSettings {
            torrents_save_path: "/old".to_string(),
            ..BtSettings::baseline()
        });
        let newer = Arc::new(BtSettings {
            torrents_save_path: "/new".to_string(),
            ..BtSettings::baseline()
        });
        publish(&slot, newer.clone());

        adopt_cache_dir(&slot, &Arc::downgrade(&launched), PathBuf::from("/old/.tsc"));

        let active = read_slot(&slot).unwrap();
        assert!(Arc::ptr_eq(&active, &newer));
    }

    #[test]
    fn test_scan_result_replaces_save_path() {
        let slot: Slot = RwLock::new(None);
        let launched = Arc::new(BtSettings {
            use_disk: true,
            torrents_save_path: "/data".to_string(),
            ..BtSettings::baseline()
        });
        publish(&slot, launched.clone());

        adopt_cache_dir(&slot, &Arc::downgrade(&launched), PathBuf::from("/data/.tsc"));

        let active = read_slot(&slot).unwrap();
        assert_eq!(active.torrents_save_path, "/data/.tsc");
        assert!(active.use_disk);
        // The published snapshot itself is never mutated
        assert_eq!(launched.torrents_save_path, "/data");
    }
}
