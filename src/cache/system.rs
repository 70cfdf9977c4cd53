//! Two-tier cache facade.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::cache::config::CacheConfig;
use crate::cache::entry::CacheEntry;
use crate::cache::memory::MemoryTier;
use crate::cache::persistent::{PersistentTier, RawRead};
use crate::cache::stats::CacheStats;
use crate::cache::sweeper::{EvictionSweeper, SweepOutcome};
use crate::clock::{Clock, SystemClock};
use crate::geo::GeoKey;
use crate::store::{KeyValueStore, StoreError};

/// Geo-bucketed two-tier TTL cache.
///
/// Lookup strategy:
/// 1. Memory tier (fast path, never suspends)
/// 2. Persistent tier; a fresh hit is promoted back into memory
/// 3. Miss - the caller fetches from origin and calls [`set`](Self::set)
///
/// Construct one cache per process at startup and share it by reference;
/// there is no hidden global instance.
///
/// # Example
///
/// ```ignore
/// use geosample::cache::{CacheConfig, SampleCache};
/// use geosample::store::MemoryKvStore;
/// use std::sync::Arc;
///
/// let cache: SampleCache<WindSample, _> =
///     SampleCache::new(CacheConfig::new("wind_data_"), Arc::new(MemoryKvStore::new()));
///
/// cache.set(41.01, 28.98, WindSample { u: 1.2, v: -0.4 }).await;
/// let hit = cache.get(41.01, 28.98).await;
/// ```
pub struct SampleCache<V, S> {
    memory: MemoryTier<V>,
    persistent: PersistentTier<V, S>,
    sweeper: EvictionSweeper,
    stats: Mutex<CacheStats>,
    ttl_ms: u64,
    clock: Arc<dyn Clock>,
}

impl<V, S> SampleCache<V, S>
where
    V: Clone + Serialize + DeserializeOwned + Send + Sync,
    S: KeyValueStore,
{
    /// Create a cache over the given durable store, using the system clock.
    pub fn new(config: CacheConfig, store: Arc<S>) -> Self {
        Self::with_clock(config, store, Arc::new(SystemClock))
    }

    /// Create a cache with an injected clock (tests drive TTL with this).
    pub fn with_clock(config: CacheConfig, store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        let now = clock.now_ms();
        Self {
            memory: MemoryTier::new(),
            persistent: PersistentTier::new(store, config.key_prefix.clone()),
            sweeper: EvictionSweeper::new(config.sweep_interval_ms(), now),
            stats: Mutex::new(CacheStats::new()),
            ttl_ms: config.ttl_ms(),
            clock,
        }
    }

    /// Look up the sample cached for a coordinate's bucket.
    ///
    /// Returns `None` once the TTL has elapsed since the bucket was last
    /// written - a stale value is never returned. On a fresh memory hit this
    /// performs no I/O and never suspends.
    pub async fn get(&self, lat: f64, lon: f64) -> Option<CacheEntry<V>> {
        let key = GeoKey::from_coords(lat, lon);
        let now = self.clock.now_ms();

        if let Some(entry) = self.memory.get(&key) {
            if entry.is_fresh(now, self.ttl_ms) {
                self.stats.lock().unwrap().record_memory_hit();
                return Some(entry);
            }
            // A stale memory entry is left for the sweeper and falls through
            // to the persistent check below. The persistent copy is at least
            // as old, so that lookup cannot succeed.
            // TODO: short-circuit to a miss here instead of re-reading the store.
        }
        self.stats.lock().unwrap().record_memory_miss();

        match self.persistent.read(&key).await {
            Ok(RawRead::Hit(entry)) if entry.is_fresh(now, self.ttl_ms) => {
                self.stats.lock().unwrap().record_persistent_hit();
                self.memory.insert(key, entry.clone());
                Some(entry)
            }
            Ok(RawRead::Hit(_)) | Ok(RawRead::Absent) => {
                self.stats.lock().unwrap().record_persistent_miss();
                None
            }
            Ok(RawRead::Corrupt) => {
                let mut stats = self.stats.lock().unwrap();
                stats.record_corrupt_read();
                stats.record_persistent_miss();
                None
            }
            Err(e) => {
                warn!(key = %key, error = %e, "persistent read failed, treating as miss");
                self.stats.lock().unwrap().record_persistent_miss();
                None
            }
        }
    }

    /// Cache a sample for a coordinate's bucket.
    ///
    /// The memory tier is updated synchronously; the persistent write is
    /// best-effort and its failure never surfaces to the caller. After the
    /// write, one sweep pass runs if none has run within the sweep interval.
    pub async fn set(&self, lat: f64, lon: f64, value: V) {
        self.set_entry(lat, lon, value, false).await;
    }

    /// Cache a sample produced by a simulation model rather than observation.
    pub async fn set_simulated(&self, lat: f64, lon: f64, value: V) {
        self.set_entry(lat, lon, value, true).await;
    }

    async fn set_entry(&self, lat: f64, lon: f64, value: V, simulated: bool) {
        let key = GeoKey::from_coords(lat, lon);
        let now = self.clock.now_ms();

        let mut entry = CacheEntry::new(value, now);
        if simulated {
            entry = entry.simulated();
        }

        self.memory.insert(key.clone(), entry.clone());

        match self.persistent.write(&key, &entry).await {
            Ok(()) => self.stats.lock().unwrap().record_persistent_write(),
            Err(e) => {
                warn!(key = %key, error = %e, "best-effort persistent write failed");
                self.stats.lock().unwrap().record_persistent_write_failure();
            }
        }

        // Maintenance rides on write traffic; an idle cache never sweeps.
        if self.sweeper.should_sweep(now) {
            let outcome = self
                .sweeper
                .sweep(now, self.ttl_ms, &self.memory, &self.persistent)
                .await;
            self.record_sweep(outcome);
        }
    }

    /// Look up many coordinates at once.
    ///
    /// Returns exactly one result per input coordinate, keyed by its bucket
    /// key; a miss is an explicit `None`, never an omitted key. Persistent
    /// reads run concurrently since they are independent.
    pub async fn get_batch(&self, coords: &[(f64, f64)]) -> HashMap<GeoKey, Option<CacheEntry<V>>> {
        let lookups = coords.iter().map(|&(lat, lon)| async move {
            (GeoKey::from_coords(lat, lon), self.get(lat, lon).await)
        });

        futures::future::join_all(lookups).await.into_iter().collect()
    }

    /// Cache many samples at once.
    ///
    /// Writes run concurrently; one entry's persistence failure never aborts
    /// or fails the others.
    pub async fn set_batch(&self, entries: Vec<(f64, f64, V)>) {
        let writes = entries
            .into_iter()
            .map(|(lat, lon, value)| self.set(lat, lon, value));

        futures::future::join_all(writes).await;
    }

    /// Empty the memory tier and delete every persistent record in this
    /// cache's namespace.
    ///
    /// Once `clear` returns `Ok`, nothing written before the call is
    /// retrievable. Entries written concurrently with the call may or may not
    /// survive. This is the one operation whose store failure is reported
    /// rather than swallowed, since it carries a deletion guarantee.
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.memory.clear();

        let storage_keys = self.persistent.storage_keys().await?;
        self.persistent.remove_many(&storage_keys).await
    }

    /// Run one sweep pass immediately, bypassing the throttle.
    ///
    /// Entry point for the background [`SweepDaemon`](crate::cache::SweepDaemon)
    /// and for tests; also resets the throttle window.
    pub async fn sweep_now(&self) -> SweepOutcome {
        let now = self.clock.now_ms();
        let outcome = self
            .sweeper
            .sweep(now, self.ttl_ms, &self.memory, &self.persistent)
            .await;
        self.record_sweep(outcome);
        outcome
    }

    /// Snapshot of cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.lock().unwrap().clone()
    }

    /// Number of entries currently in the memory tier, fresh or stale.
    pub fn memory_entry_count(&self) -> usize {
        self.memory.entry_count()
    }

    fn record_sweep(&self, outcome: SweepOutcome) {
        self.stats
            .lock()
            .unwrap()
            .record_sweep(outcome.memory_removed as u64, outcome.persistent_removed as u64);
    }
}
