//! Expiry Sweep Task
//!
//! Background task that periodically reclaims memory held by stale entries.
//! Reads stay correct without it; lazy expiry on Get is always applied.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::ShardedCache;

/// Spawns a background task that purges expired entries every
/// `sweep_interval_secs` seconds.
///
/// Each pass locks one shard at a time, so the sweep never blocks the whole
/// cache. The purge runs on the blocking pool because shard locks are
/// synchronous.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(ShardedCache::<String>::new(256)?);
/// let sweep_handle = spawn_sweep_task(cache.clone(), 30);
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task<V>(
    cache: Arc<ShardedCache<V>>,
    sweep_interval_secs: u64,
) -> JoinHandle<()>
where
    V: Send + Sync + 'static,
{
    let period = Duration::from_secs(sweep_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting expiry sweep task with interval of {} seconds",
            period.as_secs()
        );

        let mut ticker = tokio::time::interval(period);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let cache = Arc::clone(&cache);
            let removed = match tokio::task::spawn_blocking(move || cache.purge_expired()).await {
                Ok(removed) => removed,
                Err(err) => {
                    warn!("Expiry sweep pass did not complete: {}", err);
                    continue;
                }
            };

            if removed > 0 {
                info!("Expiry sweep: removed {} expired entries", removed);
            } else {
                debug!("Expiry sweep: no expired entries found");
            }
        }
    })
}
