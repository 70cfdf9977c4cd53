//! Background sweep daemon.
//!
//! Sweeping normally piggybacks on write traffic, which means a cache that
//! stops receiving writes keeps its stale entries (reads still re-validate,
//! so nothing stale is ever served). Deployments that want eviction
//! decoupled from write traffic run this daemon: a tokio task that sweeps on
//! a fixed interval until cancelled.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cache::system::SampleCache;
use crate::store::KeyValueStore;

/// Periodic background sweeper for a [`SampleCache`].
///
/// Dropping the daemon cancels it; call [`shutdown`](Self::shutdown) to also
/// wait for the task to finish.
pub struct SweepDaemon {
    handle: Option<JoinHandle<()>>,
    shutdown: CancellationToken,
}

impl SweepDaemon {
    /// Start sweeping `cache` every `interval`.
    pub fn start<V, S>(cache: Arc<SampleCache<V, S>>, interval: Duration) -> Self
    where
        V: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
        S: KeyValueStore + 'static,
    {
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();

        let handle = tokio::spawn(async move {
            info!(interval_secs = interval.as_secs(), "sweep daemon started");

            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        debug!("sweep daemon shutting down");
                        break;
                    }
                    _ = tokio::time::sleep(interval) => {
                        let outcome = cache.sweep_now().await;
                        if outcome.memory_removed > 0 || outcome.persistent_removed > 0 {
                            debug!(
                                memory_removed = outcome.memory_removed,
                                persistent_removed = outcome.persistent_removed,
                                "periodic sweep evicted entries"
                            );
                        }
                    }
                }
            }
        });

        Self {
            handle: Some(handle),
            shutdown,
        }
    }

    /// Stop the daemon and wait for its task to finish.
    pub async fn shutdown(mut self) {
        self.shutdown.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }

    /// Whether the daemon task is still running.
    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for SweepDaemon {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
