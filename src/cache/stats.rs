//! Cache statistics tracking.

/// Cache statistics for monitoring and debugging.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    // Memory tier metrics
    pub memory_hits: u64,
    pub memory_misses: u64,
    pub memory_evictions: u64,

    // Persistent tier metrics
    pub persistent_hits: u64,
    pub persistent_misses: u64,
    pub persistent_evictions: u64,
    pub persistent_writes: u64,
    pub persistent_write_failures: u64,

    /// Stored records that failed to deserialize and were treated as misses.
    pub corrupt_reads: u64,

    /// Completed sweep passes.
    pub sweeps: u64,
}

impl CacheStats {
    /// Create a zeroed statistics tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Memory tier hit rate (0.0 to 1.0).
    pub fn memory_hit_rate(&self) -> f64 {
        hit_rate(self.memory_hits, self.memory_misses)
    }

    /// Persistent tier hit rate (0.0 to 1.0).
    pub fn persistent_hit_rate(&self) -> f64 {
        hit_rate(self.persistent_hits, self.persistent_misses)
    }

    /// Overall hit rate across both tiers (0.0 to 1.0).
    ///
    /// A request only reaches the persistent tier after a memory miss, so
    /// persistent misses are the full misses.
    pub fn overall_hit_rate(&self) -> f64 {
        hit_rate(self.memory_hits + self.persistent_hits, self.persistent_misses)
    }

    pub(crate) fn record_memory_hit(&mut self) {
        self.memory_hits += 1;
    }

    pub(crate) fn record_memory_miss(&mut self) {
        self.memory_misses += 1;
    }

    pub(crate) fn record_persistent_hit(&mut self) {
        self.persistent_hits += 1;
    }

    pub(crate) fn record_persistent_miss(&mut self) {
        self.persistent_misses += 1;
    }

    pub(crate) fn record_corrupt_read(&mut self) {
        self.corrupt_reads += 1;
    }

    pub(crate) fn record_persistent_write(&mut self) {
        self.persistent_writes += 1;
    }

    pub(crate) fn record_persistent_write_failure(&mut self) {
        self.persistent_write_failures += 1;
    }

    pub(crate) fn record_sweep(&mut self, memory_removed: u64, persistent_removed: u64) {
        self.sweeps += 1;
        self.memory_evictions += memory_removed;
        self.persistent_evictions += persistent_removed;
    }
}

fn hit_rate(hits: u64, misses: u64) -> f64 {
    let total = hits + misses;
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}
