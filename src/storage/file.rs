//! File-backed store
//!
//! Everything lives in one JSON document of the form
//! `{"<namespace>": {"<key>": "<value>"}}`. Values must be UTF-8, which holds
//! for the JSON records this crate writes.

use super::KvStore;
use crate::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

type Document = BTreeMap<String, BTreeMap<String, String>>;

/// Store persisted to a single JSON file
#[derive(Debug)]
pub struct JsonFileStore {
    /// Path to the store file
    path: PathBuf,
    /// Serializes read-modify-write cycles
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Create a store for `path`; the file is created on first write
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<Document> {
        if !fs::try_exists(&self.path).await? {
            debug!("Store file does not exist: {:?}", self.path);
            return Ok(Document::new());
        }

        let content = fs::read_to_string(&self.path).await?;
        if content.trim().is_empty() {
            return Ok(Document::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            crate::Error::storage("parse", &format!("Invalid store file {:?}: {}", self.path, e))
        })
    }

    async fn write_document(&self, document: &Document) -> Result<()> {
        let content = serde_json::to_string_pretty(document)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = fs::create_dir_all(parent).await
        {
            error!("Failed to create store directory {:?}: {}", parent, e);
            return Err(crate::Error::storage(
                "directory_creation",
                &format!("Directory creation failed: {}", e),
            ));
        }

        // Write next to the target and rename so readers never see half a file
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content).await.map_err(|e| {
            error!("Failed to write store file {:?}: {}", tmp_path, e);
            crate::Error::storage("file_write", &format!("Write failed: {}", e))
        })?;
        fs::rename(&tmp_path, &self.path).await.map_err(|e| {
            error!("Failed to replace store file {:?}: {}", self.path, e);
            crate::Error::storage("file_write", &format!("Rename failed: {}", e))
        })?;

        debug!("Store saved to: {:?}", self.path);
        Ok(())
    }
}

#[async_trait]
impl KvStore for JsonFileStore {
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>> {
        let document = self.read_document().await?;
        Ok(document
            .get(namespace)
            .and_then(|ns| ns.get(key))
            .map(|value| value.clone().into_bytes()))
    }

    async fn set(&self, namespace: &str, key: &str, value: Vec<u8>) -> Result<()> {
        let value = String::from_utf8(value).map_err(|e| {
            crate::Error::storage("encode", &format!("Value is not UTF-8: {}", e))
        })?;

        let _guard = self.write_lock.lock().await;
        let mut document = match self.read_document().await {
            Ok(document) => document,
            Err(e) => {
                warn!("Discarding unreadable store file {:?}: {}", self.path, e);
                Document::new()
            }
        };

        document
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), value);
        self.write_document(&document).await
    }
}
