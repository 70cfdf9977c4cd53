//! Coordinate bucketing.
//!
//! Map coordinates are bucketed onto a grid by rounding latitude and
//! longitude to 2 decimal places (~1.1 km cell size near the equator).
//! Distinct physical points inside one cell intentionally collide onto the
//! same key: the cache trades spatial precision for hit rate.

use std::fmt;

/// Bucket key for a coordinate pair.
///
/// Formed by rounding each coordinate to 2 decimal places and joining as
/// `"{lat},{lon}"`, e.g. `"41.01,28.98"`. Keys are canonical: any two
/// coordinates in the same cell produce the identical key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeoKey(String);

impl GeoKey {
    /// Build the bucket key for a coordinate pair.
    ///
    /// Pure and deterministic, never fails. No range validation is done:
    /// out-of-range coordinates simply bucket into their own cells.
    pub fn from_coords(lat: f64, lon: f64) -> Self {
        Self(format!("{:.2},{:.2}", lat, lon))
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The namespaced key used in the persistent store.
    pub fn storage_key(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.0)
    }
}

impl fmt::Display for GeoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
