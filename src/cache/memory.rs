//! In-Memory Cache Backend
//!
//! HashMap storage behind a single mutex, with lazy expiry on read and a
//! background sweeper that reclaims entries nobody reads anymore.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::cache::{CacheBackend, CacheEntry};
use crate::error::Result;
use crate::tasks::spawn_sweep_task;

/// Entry storage shared between the backend and its sweeper.
pub type SharedEntries = Arc<Mutex<HashMap<String, CacheEntry>>>;

// == Memory Cache ==
/// Cache backend that keeps results in local memory.
#[derive(Debug)]
pub struct MemoryCache {
    /// Key-value storage
    entries: SharedEntries,
    /// Number of cache hits since construction or last flush
    hits: AtomicU64,
    /// Sliding TTL window
    ttl: Duration,
    /// Stops the sweeper
    shutdown: CancellationToken,
    /// Sweeper handle, taken on close
    sweeper: std::sync::Mutex<Option<JoinHandle<()>>>,
}

impl MemoryCache {
    // == Constructor ==
    /// Creates an empty cache and starts its sweeper.
    ///
    /// # Arguments
    /// * `ttl` - Sliding TTL window applied on every set and hit
    /// * `sweep_interval` - Delay between two background sweeps
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime or if `sweep_interval` is zero.
    pub fn new(ttl: Duration, sweep_interval: Duration) -> Self {
        let entries: SharedEntries = Arc::new(Mutex::new(HashMap::new()));
        let shutdown = CancellationToken::new();
        let sweeper = spawn_sweep_task(entries.clone(), sweep_interval, shutdown.clone());

        Self {
            entries,
            hits: AtomicU64::new(0),
            ttl,
            shutdown,
            sweeper: std::sync::Mutex::new(Some(sweeper)),
        }
    }
}

// == Purge Expired ==
/// Removes every expired entry from `entries`.
///
/// Returns the number of entries removed.
pub fn purge_expired(entries: &mut HashMap<String, CacheEntry>) -> usize {
    let before = entries.len();
    entries.retain(|_, entry| !entry.is_expired());
    before - entries.len()
}

#[async_trait]
impl CacheBackend for MemoryCache {
    async fn get(&self, key: &str) -> Option<i64> {
        let mut entries = self.entries.lock().await;
        let entry = entries.get_mut(key)?;

        if entry.is_expired() {
            entries.remove(key);
            debug!(key, "Lazily removed expired entry");
            return None;
        }

        entry.touch(self.ttl);
        Some(entry.value)
    }

    async fn set_with_ttl(&self, key: &str, value: i64) {
        let entry = CacheEntry::new(value, self.ttl);
        self.entries.lock().await.insert(key.to_string(), entry);
    }

    async fn incr_counter(&self) {
        self.hits.fetch_add(1, Ordering::SeqCst);
    }

    async fn counter(&self) -> u64 {
        self.hits.load(Ordering::SeqCst)
    }

    // Counts expired entries until the next sweep or read removes them.
    async fn size(&self) -> usize {
        self.entries.lock().await.len()
    }

    async fn flush(&self) {
        let mut entries = self.entries.lock().await;
        entries.clear();
        self.hits.store(0, Ordering::SeqCst);
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn close(&self) {
        self.shutdown.cancel();

        let handle = match self.sweeper.lock() {
            Ok(mut guard) => guard.take(),
            Err(_) => None,
        };

        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!("Sweep task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for MemoryCache {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
