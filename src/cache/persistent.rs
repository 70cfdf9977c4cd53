//! Durable cache tier.
//!
//! A typed layer over a [`KeyValueStore`]: entries are serialized to JSON
//! records under namespaced keys (`"{prefix}{geokey}"`). The tier reports
//! read outcomes precisely - a record that exists but fails to parse is
//! [`RawRead::Corrupt`], not merely absent - so the facade and the sweeper
//! can treat the two differently even though both surface to callers as an
//! ordinary miss.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::cache::entry::CacheEntry;
use crate::geo::GeoKey;
use crate::store::{KeyValueStore, StoreError};

/// Outcome of a persistent-tier read.
#[derive(Debug)]
pub(crate) enum RawRead<V> {
    /// A record was found and parsed.
    Hit(CacheEntry<V>),
    /// No record under this key.
    Absent,
    /// A record was found but could not be deserialized.
    Corrupt,
}

/// Durable key→entry store layered over a [`KeyValueStore`].
pub(crate) struct PersistentTier<V, S> {
    store: Arc<S>,
    key_prefix: String,
    _value: PhantomData<fn() -> V>,
}

impl<V, S> PersistentTier<V, S>
where
    V: Serialize + DeserializeOwned,
    S: KeyValueStore,
{
    pub fn new(store: Arc<S>, key_prefix: String) -> Self {
        Self {
            store,
            key_prefix,
            _value: PhantomData,
        }
    }

    /// Read the entry for a bucket key.
    ///
    /// `Err` means the store itself failed; `Ok(RawRead::Corrupt)` means the
    /// stored record could not be parsed. Corrupt records are left in place
    /// here - the sweeper deletes them.
    pub async fn read(&self, key: &GeoKey) -> Result<RawRead<V>, StoreError> {
        self.read_record(&key.storage_key(&self.key_prefix)).await
    }

    /// Read an entry by its full storage key (sweep path).
    pub async fn read_record(&self, storage_key: &str) -> Result<RawRead<V>, StoreError> {
        let Some(record) = self.store.get(storage_key).await? else {
            return Ok(RawRead::Absent);
        };

        match CacheEntry::from_record(&record) {
            Ok(entry) => Ok(RawRead::Hit(entry)),
            Err(e) => {
                debug!(key = storage_key, error = %e, "discarding corrupt cache record");
                Ok(RawRead::Corrupt)
            }
        }
    }

    /// Durably write an entry.
    ///
    /// Failures are returned, not swallowed; the facade decides that a
    /// persistence failure must not fail the caller's write.
    pub async fn write(&self, key: &GeoKey, entry: &CacheEntry<V>) -> Result<(), StoreError> {
        let record = entry.to_record()?;
        self.store
            .set(&key.storage_key(&self.key_prefix), &record)
            .await
    }

    /// All storage keys in this cache's namespace.
    pub async fn storage_keys(&self) -> Result<Vec<String>, StoreError> {
        self.store.keys_with_prefix(&self.key_prefix).await
    }

    /// Bulk-delete storage keys.
    pub async fn remove_many(&self, storage_keys: &[String]) -> Result<(), StoreError> {
        self.store.remove_many(storage_keys).await
    }
}
