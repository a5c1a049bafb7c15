//! shardcache - Concurrent Set/Get benchmark over the sharded cache
//!
//! Fills a fresh cache with `BENCH_OPERATIONS` concurrent sets, reads every
//! key back concurrently, and logs the elapsed time of each phase.

use std::sync::Arc;

use anyhow::{ensure, Context};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shardcache::bench::{self, BenchConfig};
use shardcache::{spawn_sweep_task, Config, ShardedCache};

/// Main entry point for the benchmark.
///
/// # Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load cache and benchmark configuration from environment variables
/// 3. Create the sharded cache with the configured shard count
/// 4. Start the expiry sweep task, if enabled
/// 5. Run the Set phase then the Get phase on the blocking pool
/// 6. Log the final statistics
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shardcache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let bench_config = BenchConfig::from_env();
    info!(
        "Configuration loaded: shard_count={}, sweep_interval={}s, operations={}, workers={}",
        config.shard_count, config.sweep_interval, bench_config.operations, bench_config.workers
    );

    let cache = Arc::new(ShardedCache::from_config(&config).context("failed to create cache")?);

    let sweep_handle = config
        .sweep_interval()
        .map(|interval| spawn_sweep_task(cache.clone(), interval));

    info!("Benchmarking sharded memory cache...");
    let report = {
        let cache = Arc::clone(&cache);
        tokio::task::spawn_blocking(move || bench::run(&cache, &bench_config))
            .await
            .context("benchmark task did not complete")?
            .context("benchmark failed")?
    };

    if let Some(handle) = sweep_handle {
        handle.abort();
        warn!("Expiry sweep task aborted");
    }

    ensure!(
        report.get.hits == report.get.operations,
        "only {} of {} gets returned their value",
        report.get.hits,
        report.get.operations
    );

    let stats = cache.stats();
    info!(
        "Done: set {:?}, get {:?}, stats {}",
        report.set.elapsed,
        report.get.elapsed,
        serde_json::to_string(&stats).context("failed to encode stats")?
    );
    Ok(())
}
