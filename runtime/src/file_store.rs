//! Durable key-value slots backed by the filesystem.
//!
//! Each key maps to `<dir>/<key>.json`. Writes go to a sibling temp file
//! first and are moved into place with a rename, so a crash mid-write leaves
//! the previous value intact.

use crate::metrics;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tasklist_core::storage::{KeyValueStore, StorageError};

/// A [`KeyValueStore`] that keeps one file per slot in a directory.
///
/// # Example
///
/// ```no_run
/// use tasklist_core::storage::KeyValueStore;
/// use tasklist_runtime::FileKeyValueStore;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = FileKeyValueStore::new(".tasklist").with_quota(64 * 1024);
/// store.set("todos", "[]")?;
/// assert_eq!(store.get("todos")?.as_deref(), Some("[]"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
    quota: Option<usize>,
}

impl FileKeyValueStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            quota: None,
        }
    }

    /// Reject writes whose value is larger than `bytes`.
    #[must_use]
    pub const fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    /// The directory slots are stored in.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] if `key` is empty or would
    /// escape the store directory.
    pub fn slot_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(StorageError::Unavailable(format!("invalid slot key {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(key)?;
        match fs::read(&path) {
            Ok(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|error| StorageError::Corrupt {
                    key: key.to_string(),
                    reason: error.to_string(),
                }),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    #[tracing::instrument(skip(self, value), fields(bytes = value.len()))]
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(limit) = self.quota {
            if value.len() > limit {
                metrics::counter!(metrics::FILE_QUOTA_REJECTIONS).increment(1);
                return Err(StorageError::QuotaExceeded {
                    needed: value.len(),
                    limit,
                });
            }
        }

        let path = self.slot_path(key)?;
        fs::create_dir_all(&self.dir)?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        if let Err(error) = fs::rename(&tmp, &path) {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                tracing::debug!(%cleanup, path = %tmp.display(), "Temp file left behind");
            }
            return Err(error.into());
        }

        metrics::counter!(metrics::FILE_BYTES_WRITTEN).increment(value.len() as u64);
        tracing::debug!(path = %path.display(), "Slot written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}
