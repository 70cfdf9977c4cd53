//! Durable key-value store abstraction.
//!
//! The persistent cache tier is a thin layer over an asynchronous key-value
//! store. The [`KeyValueStore`] trait is the seam: production code uses the
//! file-backed [`FsKvStore`], tests and cache-disabled runs use the ephemeral
//! [`MemoryKvStore`], and embedders can plug in their own backend (a mobile
//! platform's preference store, an embedded database) without touching the
//! cache logic.

mod fs;
mod memory;

pub use fs::FsKvStore;
pub use memory::MemoryKvStore;

use std::future::Future;
use thiserror::Error;

/// Errors from the durable store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error from the underlying storage
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be serialized for storage
    #[error("store serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Backend-specific failure (quota, connection, ...)
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Asynchronous durable key-value store.
///
/// Values are opaque text records; the cache layers typed (de)serialization
/// on top. All operations may suspend the caller. Implementations must be
/// safe to share across threads.
pub trait KeyValueStore: Send + Sync {
    /// Look up a stored value.
    ///
    /// Returns `Ok(None)` when the key is absent. An absent key is not an
    /// error; only backend failures are.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;

    /// Durably write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Delete the given keys. Keys that do not exist are skipped.
    fn remove_many(&self, keys: &[String]) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Enumerate stored keys starting with `prefix`.
    fn keys_with_prefix(
        &self,
        prefix: &str,
    ) -> impl Future<Output = Result<Vec<String>, StoreError>> + Send;
}
