//! In-memory key/value medium.
//!
//! Used as the fallback when the SQLite file cannot be opened, and as a
//! lightweight medium in tests. Contents live only as long as the value.

use super::{KeyValueStore, StorageError, StorageMedium, StorageResult};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: HashMap<String, String>,
    quota_bytes: Option<usize>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that rejects writes once keys plus values would
    /// exceed `quota_bytes` in total.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota_bytes: Some(quota_bytes),
        }
    }

    fn used_bytes_excluding(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(existing, _)| existing.as_str() != key)
            .map(|(existing, value)| existing.len() + value.len())
            .sum()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()> {
        if let Some(quota) = self.quota_bytes {
            let required = self.used_bytes_excluding(key) + key.len() + value.len();
            if required > quota {
                return Err(StorageError::QuotaExceeded);
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> StorageResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn medium(&self) -> StorageMedium {
        StorageMedium::Memory
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryKeyValueStore;
    use crate::storage::{KeyValueStore, StorageError};

    #[test]
    fn set_get_remove_roundtrip() {
        let mut store = MemoryKeyValueStore::new();
        assert_eq!(store.get_item("contacts").unwrap(), None);

        store.set_item("contacts", "[]").unwrap();
        assert_eq!(store.get_item("contacts").unwrap().as_deref(), Some("[]"));

        store.remove_item("contacts").unwrap();
        store.remove_item("contacts").unwrap();
        assert_eq!(store.get_item("contacts").unwrap(), None);
    }

    #[test]
    fn quota_counts_replacement_not_accumulation() {
        let mut store = MemoryKeyValueStore::with_quota(12);
        store.set_item("k", "0123456789").unwrap();
        store.set_item("k", "abcdefghij").unwrap();

        let err = store.set_item("k", "abcdefghijkl").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded));
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("abcdefghij"));
    }
}
