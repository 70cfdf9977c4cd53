//! Cache configuration.

use std::time::Duration;

/// Default entry time-to-live (10 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

/// Default minimum interval between sweeps (60 seconds).
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Default namespace prefix for persistent keys.
pub const DEFAULT_KEY_PREFIX: &str = "sample_";

/// Cache configuration.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum entry age before it is considered stale.
    pub ttl: Duration,
    /// Minimum interval between opportunistic sweeps.
    pub sweep_interval: Duration,
    /// Namespace prefix for keys in the persistent store.
    pub key_prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }
}

impl CacheConfig {
    /// Create a configuration with the given persistent-key prefix.
    pub fn new(key_prefix: impl Into<String>) -> Self {
        Self {
            key_prefix: key_prefix.into(),
            ..Self::default()
        }
    }

    /// Set the entry time-to-live.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the minimum interval between sweeps.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    pub(crate) fn ttl_ms(&self) -> u64 {
        self.ttl.as_millis() as u64
    }

    pub(crate) fn sweep_interval_ms(&self) -> u64 {
        self.sweep_interval.as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CacheConfig::default();

        assert_eq!(config.ttl, Duration::from_secs(600));
        assert_eq!(config.sweep_interval, Duration::from_secs(60));
        assert_eq!(config.key_prefix, "sample_");
    }

    #[test]
    fn test_builder() {
        let config = CacheConfig::new("wind_data_")
            .with_ttl(Duration::from_secs(300))
            .with_sweep_interval(Duration::from_secs(30));

        assert_eq!(config.key_prefix, "wind_data_");
        assert_eq!(config.ttl_ms(), 300_000);
        assert_eq!(config.sweep_interval_ms(), 30_000);
    }
}
