//! Age-based eviction sweeping.
//!
//! A sweep drops every stale entry from the memory tier, then linearly scans
//! the persistent namespace and bulk-deletes records that are stale or fail
//! to parse. The full-namespace scan is fine for a per-process cache; it is
//! not meant for a shared multi-tenant store.
//!
//! Sweeps piggyback on write traffic: the facade asks [`EvictionSweeper::should_sweep`]
//! after every set, and the throttle admits at most one sweep per interval.
//! An idle cache never sweeps, but it also never serves stale data - reads
//! re-validate freshness regardless.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::memory::MemoryTier;
use crate::cache::persistent::{PersistentTier, RawRead};
use crate::store::KeyValueStore;

/// What a sweep pass removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Stale entries dropped from the memory tier.
    pub memory_removed: usize,
    /// Stale or corrupt records deleted from the persistent tier.
    pub persistent_removed: usize,
}

/// Throttled maintenance pass over both cache tiers.
pub(crate) struct EvictionSweeper {
    interval_ms: u64,
    last_sweep_ms: AtomicU64,
}

impl EvictionSweeper {
    /// Create a sweeper whose throttle starts counting from `now_ms`.
    pub fn new(interval_ms: u64, now_ms: u64) -> Self {
        Self {
            interval_ms,
            last_sweep_ms: AtomicU64::new(now_ms),
        }
    }

    /// Claim the right to sweep if the interval has elapsed.
    ///
    /// The check-and-set is a single compare-exchange, so of any number of
    /// concurrent writers exactly one is admitted per interval and the rest
    /// see an already-updated timestamp.
    pub fn should_sweep(&self, now_ms: u64) -> bool {
        let last = self.last_sweep_ms.load(Ordering::Acquire);
        if now_ms.saturating_sub(last) <= self.interval_ms {
            return false;
        }
        self.last_sweep_ms
            .compare_exchange(last, now_ms, Ordering::AcqRel, Ordering::Relaxed)
            .is_ok()
    }

    /// Run one sweep pass at `now_ms`.
    ///
    /// Always completes: a key whose read fails is skipped and left for the
    /// next pass rather than aborting the sweep.
    pub async fn sweep<V, S>(
        &self,
        now_ms: u64,
        ttl_ms: u64,
        memory: &MemoryTier<V>,
        persistent: &PersistentTier<V, S>,
    ) -> SweepOutcome
    where
        V: Clone + Serialize + DeserializeOwned,
        S: KeyValueStore,
    {
        self.last_sweep_ms.store(now_ms, Ordering::Release);

        let memory_removed = memory.retain_fresh(now_ms, ttl_ms);
        let mut persistent_removed = 0;

        match persistent.storage_keys().await {
            Ok(storage_keys) => {
                let mut doomed = Vec::new();

                for storage_key in storage_keys {
                    match persistent.read_record(&storage_key).await {
                        Ok(RawRead::Hit(entry)) => {
                            if !entry.is_fresh(now_ms, ttl_ms) {
                                doomed.push(storage_key);
                            }
                        }
                        Ok(RawRead::Corrupt) => doomed.push(storage_key),
                        // Deleted between enumeration and read
                        Ok(RawRead::Absent) => {}
                        Err(e) => {
                            debug!(key = %storage_key, error = %e, "sweep skipping unreadable record");
                        }
                    }
                }

                if !doomed.is_empty() {
                    match persistent.remove_many(&doomed).await {
                        Ok(()) => persistent_removed = doomed.len(),
                        Err(e) => warn!(error = %e, "sweep could not delete stale records"),
                    }
                }
            }
            Err(e) => warn!(error = %e, "sweep could not enumerate persistent keys"),
        }

        debug!(memory_removed, persistent_removed, "sweep complete");

        SweepOutcome {
            memory_removed,
            persistent_removed,
        }
    }
}
