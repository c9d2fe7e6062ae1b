//! TTL Sweep Task
//!
//! Background task that periodically removes expired entries from the
//! in-process cache, so keys nobody reads again do not pile up.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cache::{purge_expired, SharedEntries};

/// Spawns a background task that sweeps expired entries every `interval`.
///
/// The task holds the same lock as foreground cache operations while it
/// sweeps. It exits as soon as `shutdown` is cancelled, and never starts a
/// new sweep afterwards.
///
/// # Arguments
/// * `entries` - Entry storage shared with the cache
/// * `interval` - Delay between two sweeps, must be non-zero
/// * `shutdown` - Cancellation signal
///
/// # Returns
/// A JoinHandle that resolves once the task has observed shutdown.
pub fn spawn_sweep_task(
    entries: SharedEntries,
    interval: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        debug!("Starting TTL sweep task with interval of {:?}", interval);

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    let removed = {
                        let mut guard = entries.lock().await;
                        purge_expired(&mut guard)
                    };

                    if removed > 0 {
                        info!("TTL sweep: removed {} expired entries", removed);
                    } else {
                        debug!("TTL sweep: no expired entries found");
                    }
                }
            }
        }

        debug!("TTL sweep task stopped");
    })
}
