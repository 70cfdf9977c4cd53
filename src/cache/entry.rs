//! Cache entry and freshness predicate.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A cached sample plus its write timestamp.
///
/// Persisted as a JSON record with the sample's own fields flattened next to
/// `writtenAtEpochMillis` and, when set, `simulated`:
///
/// ```json
/// {"u":1.2,"v":-0.4,"writtenAtEpochMillis":1700000000000}
/// ```
///
/// The sample type must therefore serialize to a JSON object, and must not
/// itself use the `writtenAtEpochMillis` or `simulated` field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<V> {
    /// The cached sample.
    #[serde(flatten)]
    pub value: V,

    /// Write time in epoch milliseconds.
    #[serde(rename = "writtenAtEpochMillis")]
    pub written_at_ms: u64,

    /// Marks values produced by a simulation model rather than observation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulated: Option<bool>,
}

impl<V> CacheEntry<V> {
    /// Create an entry written at `now_ms`.
    pub fn new(value: V, now_ms: u64) -> Self {
        Self {
            value,
            written_at_ms: now_ms,
            simulated: None,
        }
    }

    /// Mark the entry as coming from a simulation model.
    pub fn simulated(mut self) -> Self {
        self.simulated = Some(true);
        self
    }

    /// Whether the entry is still within its TTL at `now_ms`.
    ///
    /// An entry exactly `ttl_ms` old is stale.
    pub fn is_fresh(&self, now_ms: u64, ttl_ms: u64) -> bool {
        self.age_ms(now_ms) < ttl_ms
    }

    /// Entry age in milliseconds, zero if the clock reads before the write.
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.written_at_ms)
    }
}

impl<V: Serialize> CacheEntry<V> {
    /// Serialize to the persisted record format.
    pub(crate) fn to_record(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl<V: DeserializeOwned> CacheEntry<V> {
    /// Parse a persisted record.
    pub(crate) fn from_record(record: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct WindSample {
        u: f64,
        v: f64,
    }

    #[test]
    fn test_freshness_within_ttl() {
        let entry = CacheEntry::new(WindSample { u: 1.2, v: -0.4 }, 1_000);

        assert!(entry.is_fresh(1_000, 600_000));
        assert!(entry.is_fresh(600_999, 600_000));
    }

    #[test]
    fn test_stale_at_exact_ttl() {
        let entry = CacheEntry::new(WindSample { u: 1.2, v: -0.4 }, 1_000);

        assert!(!entry.is_fresh(601_000, 600_000));
        assert!(!entry.is_fresh(2_000_000, 600_000));
    }

    #[test]
    fn test_age_saturates_on_clock_skew() {
        let entry = CacheEntry::new(WindSample { u: 0.0, v: 0.0 }, 5_000);

        // Clock moved backwards: treat as just written, not as an underflow
        assert_eq!(entry.age_ms(1_000), 0);
        assert!(entry.is_fresh(1_000, 600_000));
    }

    #[test]
    fn test_record_format_flattens_value_fields() {
        let entry = CacheEntry::new(WindSample { u: 1.2, v: -0.4 }, 1_700_000_000_000);
        let record = entry.to_record().unwrap();

        assert!(record.contains("\"u\":1.2"));
        assert!(record.contains("\"writtenAtEpochMillis\":1700000000000"));
        // Unset simulated flag is omitted from the record
        assert!(!record.contains("simulated"));
    }

    #[test]
    fn test_record_round_trip_with_simulated_flag() {
        let entry = CacheEntry::new(WindSample { u: 3.0, v: 0.5 }, 42).simulated();
        let record = entry.to_record().unwrap();

        assert!(record.contains("\"simulated\":true"));

        let parsed = CacheEntry::<WindSample>::from_record(&record).unwrap();
        assert_eq!(parsed, entry);
    }

    #[test]
    fn test_corrupt_record_fails_to_parse() {
        assert!(CacheEntry::<WindSample>::from_record("not json").is_err());
        assert!(CacheEntry::<WindSample>::from_record("{\"u\":1.0}").is_err());
    }
}
