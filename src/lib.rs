//! geosample - Geo-bucketed two-tier TTL caching for environmental samples.
//!
//! This library caches point samples (wind vectors, sea surface temperature,
//! and similar map-overlay data) keyed by coordinate. Nearby coordinates are
//! bucketed onto a ~1.1 km grid cell so that repeated lookups around the same
//! spot hit the cache instead of the upstream data service.
//!
//! # Architecture
//!
//! Lookups go through two tiers:
//!
//! 1. Memory tier: process-local map, synchronous, lost on restart
//! 2. Persistent tier: a durable key-value store behind the [`store::KeyValueStore`]
//!    trait, accessed asynchronously and surviving restarts
//!
//! A fresh memory hit never touches the persistent store. A fresh persistent
//! hit is promoted back into memory. Entries expire after a fixed TTL
//! (10 minutes by default); expired entries are removed by a throttled sweep
//! that piggybacks on write traffic, or by an optional background daemon.
//!
//! # High-Level API
//!
//! ```ignore
//! use geosample::cache::{CacheConfig, SampleCache};
//! use geosample::store::FsKvStore;
//! use std::sync::Arc;
//!
//! let store = Arc::new(FsKvStore::open("/var/cache/myapp/wind").await?);
//! let cache: SampleCache<WindSample, _> = SampleCache::new(CacheConfig::default(), store);
//!
//! if let Some(entry) = cache.get(41.01, 28.98).await {
//!     // Fresh sample, use it
//! } else {
//!     // Miss - fetch from origin, then cache
//!     let sample = fetch_wind(41.01, 28.98).await?;
//!     cache.set(41.01, 28.98, sample).await;
//! }
//! ```
//!
//! The cache never fetches from origin itself; callers own that path and the
//! retry policy around it.

pub mod cache;
pub mod clock;
pub mod geo;
pub mod store;
