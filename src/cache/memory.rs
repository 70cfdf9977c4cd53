//! Volatile in-process cache tier.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::cache::entry::CacheEntry;
use crate::geo::GeoKey;

/// Process-local key→entry store.
///
/// All operations are synchronous and O(1); nothing here ever suspends.
/// Contents are lost on restart by design - the persistent tier is the
/// durable copy. The map is unbounded: growth is bounded in practice by the
/// TTL sweep removing every entry older than the TTL.
pub struct MemoryTier<V> {
    entries: Mutex<HashMap<GeoKey, CacheEntry<V>>>,
}

impl<V: Clone> MemoryTier<V> {
    /// Create an empty tier.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Look up an entry regardless of freshness.
    ///
    /// Freshness is the caller's judgment: the facade needs stale entries to
    /// fall through to the persistent tier, and the sweeper needs their
    /// timestamps.
    pub fn get(&self, key: &GeoKey) -> Option<CacheEntry<V>> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    /// Insert or replace an entry.
    pub fn insert(&self, key: GeoKey, entry: CacheEntry<V>) {
        self.entries.lock().unwrap().insert(key, entry);
    }

    /// Remove an entry.
    pub fn remove(&self, key: &GeoKey) {
        self.entries.lock().unwrap().remove(key);
    }

    /// Snapshot of all keys, for sweeping.
    pub fn keys(&self) -> Vec<GeoKey> {
        self.entries.lock().unwrap().keys().cloned().collect()
    }

    /// Number of entries, fresh or stale.
    pub fn entry_count(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }

    /// Drop entries that are stale at `now_ms`; returns how many were removed.
    pub fn retain_fresh(&self, now_ms: u64, ttl_ms: u64) -> usize {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_fresh(now_ms, ttl_ms));
        before - entries.len()
    }
}

impl<V: Clone> Default for MemoryTier<V> {
    fn default() -> Self {
        Self::new()
    }
}
