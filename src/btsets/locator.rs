//! Cache directory discovery
//!
//! A previously used disk cache leaves a `.tsc` directory behind. When disk
//! caching is enabled the store walks the configured save path looking for
//! it and, if one turns up, adopts its location as the cache directory.

use crate::Result;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::task::JoinHandle;
use tracing::instrument::WithSubscriber;
use tracing::{debug, info};

/// Reserved name of the marker directory, compared case-insensitively
pub const CACHE_MARKER: &str = ".tsc";

/// Walk `root` depth first and return the first marker directory found
///
/// Entries are visited in name order, the root included. Hidden directories
/// are not descended into, but a hidden directory can itself be the marker.
/// Symlinks are never followed. The first I/O error ends the walk.
pub async fn locate_cache_dir(root: &Path) -> Result<Option<PathBuf>> {
    let root_is_dir = fs::symlink_metadata(root).await?.is_dir();
    let mut pending = vec![(root.to_path_buf(), root_is_dir)];

    while let Some((path, is_dir)) = pending.pop() {
        if !is_dir {
            continue;
        }

        let name = entry_name(&path, root);
        if is_marker(&name) {
            return Ok(Some(path));
        }
        if name.starts_with('.') {
            debug!("Skipping hidden directory {:?}", path);
            continue;
        }

        let mut children = Vec::new();
        let mut entries = fs::read_dir(&path).await?;
        while let Some(entry) = entries.next_entry().await? {
            let is_dir = entry.file_type().await?.is_dir();
            children.push((entry.path(), is_dir));
        }
        children.sort();

        // Reverse so the smallest name is popped first
        pending.extend(children.into_iter().rev());
    }

    Ok(None)
}

/// Handle to a detached locator scan
///
/// Dropping it leaves the scan running.
#[derive(Debug)]
pub struct LocatorHandle {
    inner: JoinHandle<Option<PathBuf>>,
}

impl LocatorHandle {
    /// Wait for the scan and return the marker it adopted, if any
    pub async fn finished(self) -> Option<PathBuf> {
        self.inner.await.ok().flatten()
    }

    /// True once the scan has stopped
    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }
}

/// Run [`locate_cache_dir`] on a background task
///
/// `on_found` is invoked with the marker path when one is found. Errors are
/// logged at debug level and otherwise swallowed.
pub fn spawn_locator<F>(root: PathBuf, on_found: F) -> LocatorHandle
where
    F: FnOnce(PathBuf) + Send + 'static,
{
    let task = async move {
        match locate_cache_dir(&root).await {
            Ok(Some(found)) => {
                info!("Find directory {:?}, use as cache dir", found);
                on_found(found.clone());
                Some(found)
            }
            Ok(None) => {
                debug!("No cache marker below {:?}", root);
                None
            }
            Err(e) => {
                debug!("Cache directory scan of {:?} aborted: {}", root, e);
                None
            }
        }
    };

    LocatorHandle {
        inner: tokio::spawn(task.with_current_subscriber()),
    }
}

fn is_marker(name: &str) -> bool {
    name.to_lowercase() == CACHE_MARKER
}

fn entry_name(path: &Path, root: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        // A root such as "." or "media/.." is named after its last component
        None if path == root => path
            .components()
            .next_back()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .unwrap_or_default(),
        None => String::new(),
    }
}
