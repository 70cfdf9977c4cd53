//! File-backed key-value store.
//!
//! Stores one `{key}.json` file per key in a flat directory. Cache keys only
//! contain digits, `.`, `,`, `-` and the namespace prefix, so the key maps
//! directly onto a filename on every platform without hashing or escaping.

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::store::{KeyValueStore, StoreError};

/// File extension for stored records.
const RECORD_EXT: &str = "json";

/// Durable key-value store backed by a flat directory of JSON files.
///
/// Survives process restarts; bounded only by the filesystem's own limits.
pub struct FsKvStore {
    directory: PathBuf,
}

impl FsKvStore {
    /// Open a store rooted at `directory`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub async fn open(directory: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let directory = directory.into();
        tokio::fs::create_dir_all(&directory).await?;

        debug!(dir = %directory.display(), "file store opened");

        Ok(Self { directory })
    }

    /// The directory this store writes into.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn record_path(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{}.{}", key, RECORD_EXT))
    }
}

impl KeyValueStore for FsKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match tokio::fs::read_to_string(self.record_path(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        tokio::fs::write(self.record_path(key), value).await?;
        Ok(())
    }

    async fn remove_many(&self, keys: &[String]) -> Result<(), StoreError> {
        for key in keys {
            match tokio::fs::remove_file(self.record_path(key)).await {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let mut keys = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.directory).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some(RECORD_EXT) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if stem.starts_with(prefix) {
                    keys.push(stem.to_string());
                }
            }
        }

        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_temp_store() -> (FsKvStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FsKvStore::open(temp_dir.path()).await.unwrap();
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let (store, _temp) = create_temp_store().await;

        store.set("wind_data_41.01,28.98", "{}").await.unwrap();

        let value = store.get("wind_data_41.01,28.98").await.unwrap();
        assert_eq!(value, Some("{}".to_string()));
    }

    #[tokio::test]
    async fn test_get_absent_key() {
        let (store, _temp) = create_temp_store().await;

        let value = store.get("wind_data_0.00,0.00").await.unwrap();
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_set_replaces_existing() {
        let (store, _temp) = create_temp_store().await;

        store.set("k", "first").await.unwrap();
        store.set("k", "second").await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), Some("second".to_string()));
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();

        {
            let store = FsKvStore::open(temp_dir.path()).await.unwrap();
            store.set("wind_data_10.00,10.00", "persisted").await.unwrap();
        }

        {
            let store = FsKvStore::open(temp_dir.path()).await.unwrap();
            let value = store.get("wind_data_10.00,10.00").await.unwrap();
            assert_eq!(value, Some("persisted".to_string()));
        }
    }

    #[tokio::test]
    async fn test_keys_with_prefix_filters_namespace() {
        let (store, _temp) = create_temp_store().await;

        store.set("wind_data_10.00,10.00", "a").await.unwrap();
        store.set("wind_data_20.00,20.00", "b").await.unwrap();
        store.set("swell_data_10.00,10.00", "c").await.unwrap();

        let mut keys = store.keys_with_prefix("wind_data_").await.unwrap();
        keys.sort();

        assert_eq!(
            keys,
            vec![
                "wind_data_10.00,10.00".to_string(),
                "wind_data_20.00,20.00".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_remove_many() {
        let (store, _temp) = create_temp_store().await;

        store.set("a", "1").await.unwrap();
        store.set("b", "2").await.unwrap();

        // Removing a mix of present and absent keys succeeds
        store
            .remove_many(&["a".to_string(), "b".to_string(), "c".to_string()])
            .await
            .unwrap();

        assert_eq!(store.get("a").await.unwrap(), None);
        assert_eq!(store.get("b").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_negative_coordinate_keys_are_valid_filenames() {
        let (store, _temp) = create_temp_store().await;

        store.set("wind_data_-33.87,151.21", "sydney").await.unwrap();

        let value = store.get("wind_data_-33.87,151.21").await.unwrap();
        assert_eq!(value, Some("sydney".to_string()));
    }
}
