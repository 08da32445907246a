//! TTL Sweep Task
//!
//! Background task that periodically removes expired cache entries.
//!
//! Lazy expiry alone leaves dead entries holding capacity slots if they are
//! never read again; the sweep reclaims those slots independent of access
//! patterns. Hosts without a timer facility can skip this task and call
//! `CacheStore::sweep_expired` themselves.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a background task that periodically sweeps expired cache entries.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between sweeps. Each sweep acquires the write lock on the store for the
/// duration of the pass, keeping the entry map and recency order in step.
///
/// # Arguments
/// * `cache` - Shared reference to the cache store
/// * `cleanup_interval_ms` - Interval in milliseconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task. The host must abort it when the cache
/// is disposed so no timer outlives the store.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(RwLock::new(CacheStore::new(config)?));
/// let sweep_handle = spawn_sweep_task(cache.clone(), 60_000);
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task<V>(
    cache: Arc<RwLock<CacheStore<V>>>,
    cleanup_interval_ms: u64,
) -> JoinHandle<()>
where
    V: Clone + Send + Sync + 'static,
{
    let interval = Duration::from_millis(cleanup_interval_ms);

    tokio::spawn(async move {
        info!(
            "Starting TTL sweep task with interval of {} ms",
            cleanup_interval_ms
        );

        loop {
            // Sleep for the configured interval
            tokio::time::sleep(interval).await;

            // Acquire write lock and remove expired entries
            let removed = {
                let mut cache_guard = cache.write().await;
                cache_guard.sweep_expired()
            };

            if removed > 0 {
                info!("TTL sweep: removed {} expired entries", removed);
            } else {
                debug!("TTL sweep: no expired entries found");
            }
        }
    })
}
