//! Ephemeral in-memory key-value store.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::store::{KeyValueStore, StoreError};

/// In-memory [`KeyValueStore`].
///
/// Nothing survives a restart, which makes it useful for tests and for
/// running the cache with durable storage disabled (every restart then starts
/// cold, and the cache degrades to memory-only).
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKvStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_many(&self, keys: &[String]) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap();
        for key in keys {
            entries.remove(key);
        }
        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = MemoryKvStore::new();

        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("v".to_string()));
        assert_eq!(store.len(), 1);

        store.remove_many(&["k".to_string()]).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_keys_with_prefix() {
        let store = MemoryKvStore::new();

        store.set("wind_data_a", "1").await.unwrap();
        store.set("other_b", "2").await.unwrap();

        let keys = store.keys_with_prefix("wind_data_").await.unwrap();
        assert_eq!(keys, vec!["wind_data_a".to_string()]);
    }
}
