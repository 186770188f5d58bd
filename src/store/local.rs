//! `LocalPersistence` — the namespaced view over a `KeyValueStore` that the
//! wizard components read and write through.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::DEFAULT_STORAGE_PREFIX;
use crate::error::StoreError;

use super::traits::KeyValueStore;

/// Prefix-scoped access to a shared store. Cheap to clone.
#[derive(Clone)]
pub struct LocalPersistence {
    backend: Arc<dyn KeyValueStore>,
    prefix: String,
}

impl std::fmt::Debug for LocalPersistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalPersistence")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl LocalPersistence {
    pub fn new(backend: Arc<dyn KeyValueStore>, prefix: impl Into<String>) -> Self {
        Self {
            backend,
            prefix: prefix.into(),
        }
    }

    /// Adapter using the default namespace.
    pub fn with_default_prefix(backend: Arc<dyn KeyValueStore>) -> Self {
        Self::new(backend, DEFAULT_STORAGE_PREFIX)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn scoped(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Raw string value for `key`.
    pub fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.backend.get(&self.scoped(key))
    }

    pub fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.backend.set(&self.scoped(key), value)
    }

    pub fn remove(&self, key: &str) -> Result<bool, StoreError> {
        self.backend.remove(&self.scoped(key))
    }

    /// Like [`get`](Self::get), but a backend failure is logged and read as "nothing saved".
    pub fn get_or_none(&self, key: &str) -> Option<String> {
        match self.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, "Failed to read saved value: {e}");
                None
            }
        }
    }

    /// Parse the JSON stored under `key`.
    ///
    /// Missing, unreadable, or malformed values all come back as `None`.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get_or_none(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, "Ignoring malformed saved value: {e}");
                None
            }
        }
    }

    /// Serialize `value` as JSON and store it under `key`.
    pub fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let body =
            serde_json::to_string(value).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.set(key, &body)
    }

    /// Remove every key under this adapter's prefix, leaving other data alone.
    /// Returns the number of keys removed.
    pub fn clear(&self) -> Result<usize, StoreError> {
        let mut removed = 0;
        for key in self.backend.keys()? {
            if key.starts_with(&self.prefix) && self.backend.remove(&key)? {
                removed += 1;
            }
        }
        debug!(prefix = %self.prefix, removed, "Cleared saved draft");
        Ok(removed)
    }
}
