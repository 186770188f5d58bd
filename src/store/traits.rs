//! `KeyValueStore` trait — the persistence port every draft component writes through.

use std::collections::BTreeMap;

use crate::error::StoreError;

/// Durable string-to-string storage, the moral equivalent of browser local storage.
///
/// Writes are synchronous: once `set` returns `Ok`, a subsequent `get` observes the value.
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Insert or overwrite `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete `key`. Returns whether anything was removed.
    fn remove(&self, key: &str) -> Result<bool, StoreError>;

    /// Every key currently stored, in ascending order.
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

/// Bytes consumed by a key-value map, counted as key plus value lengths.
pub(crate) fn usage(entries: &BTreeMap<String, String>) -> usize {
    entries.iter().map(|(k, v)| k.len() + v.len()).sum()
}

/// Check that replacing `key` with `value` keeps `entries` within `capacity`.
pub(crate) fn check_capacity(
    entries: &BTreeMap<String, String>,
    capacity: Option<usize>,
    key: &str,
    value: &str,
) -> Result<(), StoreError> {
    let Some(capacity) = capacity else {
        return Ok(());
    };
    let existing = entries.get(key).map(|v| key.len() + v.len()).unwrap_or(0);
    let needed = usage(entries) - existing + key.len() + value.len();
    if needed > capacity {
        return Err(StoreError::QuotaExceeded {
            key: key.to_string(),
            needed,
            capacity,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_counts_replacement_not_sum() {
        let mut entries = BTreeMap::new();
        entries.insert("k".to_string(), "12345".to_string());

        // 1 + 5 stored; replacing with 1 + 9 needs 10
        assert!(check_capacity(&entries, Some(10), "k", "123456789").is_ok());
        assert!(check_capacity(&entries, Some(9), "k", "123456789").is_err());
    }

    #[test]
    fn unbounded_capacity_always_fits() {
        let entries = BTreeMap::new();
        let big = "x".repeat(1 << 20);
        assert!(check_capacity(&entries, None, "k", &big).is_ok());
    }
}
