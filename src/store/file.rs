//! On-disk `KeyValueStore` — one JSON document holding every key.
//!
//! The whole map is loaded when the store is opened and rewritten on every
//! mutation (temp file + rename), so a crash never leaves a half-written draft.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{info, warn};

use crate::error::StoreError;

use super::traits::{KeyValueStore, check_capacity};

/// JSON-file-backed store, durable across restarts of the host process.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
    capacity: Option<usize>,
}

impl FileStore {
    /// Open (or create) a store at `path`.
    ///
    /// A missing file is an empty store. A file that does not parse is logged
    /// and treated as empty; it is overwritten on the next write.
    pub fn open(path: impl AsRef<Path>, capacity: Option<usize>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(path = %path.display(), "Discarding unreadable draft store: {e}");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        info!(path = %path.display(), keys = entries.len(), "Draft store opened");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
            capacity,
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn entries(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let body = serde_json::to_string(entries)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, body)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries();
        check_capacity(&entries, self.capacity, key, value)?;

        let previous = entries.insert(key.to_string(), value.to_string());
        if let Err(e) = self.flush(&entries) {
            // Roll back so memory never claims more than disk holds.
            match previous {
                Some(old) => entries.insert(key.to_string(), old),
                None => entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, StoreError> {
        let mut entries = self.entries();
        let Some(previous) = entries.remove(key) else {
            return Ok(false);
        };
        if let Err(e) = self.flush(&entries) {
            entries.insert(key.to_string(), previous);
            return Err(e);
        }
        Ok(true)
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.entries().keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/draft.json");

        {
            let store = FileStore::open(&path, None).unwrap();
            store.set("job_application_firstName", "Ada").unwrap();
            store.set("job_application_lastName", "Lovelace").unwrap();
            store.remove("job_application_lastName").unwrap();
        }

        let reopened = FileStore::open(&path, None).unwrap();
        assert_eq!(
            reopened.get("job_application_firstName").unwrap().as_deref(),
            Some("Ada")
        );
        assert!(reopened.get("job_application_lastName").unwrap().is_none());
    }

    #[test]
    fn corrupted_file_opens_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("draft.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = FileStore::open(&path, None).unwrap();
        assert!(store.keys().unwrap().is_empty());

        store.set("k", "v").unwrap();
        let reopened = FileStore::open(&path, None).unwrap();
        assert_eq!(reopened.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn quota_is_enforced_on_disk_store() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path().join("draft.json"), Some(4)).unwrap();
        assert!(matches!(
            store.set("key", "value"),
            Err(StoreError::QuotaExceeded { .. })
        ));
        assert!(store.get("key").unwrap().is_none());
    }
}
