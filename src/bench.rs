//! Benchmark Driver
//!
//! Issues a configurable volume of concurrent Set calls followed by the same
//! volume of concurrent Get calls against a cache, timing each phase.
//!
//! Keys are `key<i>` and values are `i` for `i` in `[0, operations)`. Work is
//! striped across a fixed pool of scoped OS threads.

use std::thread;
use std::time::{Duration, Instant};

use tracing::info;

use crate::cache::ShardedCache;
use crate::config::env_or;
use crate::error::{CacheError, Result};

// == Bench Config ==
/// Benchmark parameters.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Number of Set calls, then Get calls, to issue
    pub operations: usize,
    /// Number of worker threads per phase
    pub workers: usize,
    /// TTL in seconds for every Set
    pub ttl: i64,
}

impl BenchConfig {
    /// Loads benchmark parameters from environment variables.
    ///
    /// # Environment Variables
    /// - `BENCH_OPERATIONS` - Operations per phase (default: 2000000)
    /// - `BENCH_WORKERS` - Worker threads (default: available parallelism)
    /// - `BENCH_TTL` - TTL in seconds for each Set (default: 3600)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            operations: env_or("BENCH_OPERATIONS", defaults.operations),
            workers: env_or("BENCH_WORKERS", defaults.workers),
            ttl: env_or("BENCH_TTL", defaults.ttl),
        }
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            operations: 2_000_000,
            workers: thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
            ttl: 3600,
        }
    }
}

// == Reports ==
/// Outcome of one benchmark phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseReport {
    /// Calls issued
    pub operations: usize,
    /// Get calls that returned the expected value (0 for the Set phase)
    pub hits: usize,
    /// Wall-clock duration of the phase
    pub elapsed: Duration,
}

/// Outcome of a full Set-then-Get benchmark run.
#[derive(Debug, Clone, Copy)]
pub struct BenchReport {
    pub set: PhaseReport,
    pub get: PhaseReport,
}

/// Key used for operation `i`.
pub fn bench_key(i: usize) -> String {
    format!("key{}", i)
}

// == Phases ==
/// Issues `operations` concurrent `set(key<i>, i, ttl)` calls.
pub fn run_set_phase(
    cache: &ShardedCache<usize>,
    operations: usize,
    workers: usize,
    ttl: i64,
) -> Result<PhaseReport> {
    ensure_workers(workers)?;
    let start = Instant::now();

    thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|worker| {
                scope.spawn(move || {
                    for i in (worker..operations).step_by(workers) {
                        cache.set(&bench_key(i), i, ttl);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().map_err(|_| worker_panicked())?;
        }
        Ok::<_, CacheError>(())
    })?;

    Ok(PhaseReport {
        operations,
        hits: 0,
        elapsed: start.elapsed(),
    })
}

/// Issues `operations` concurrent `get(key<i>)` calls, counting the ones that
/// returned `i`.
pub fn run_get_phase(
    cache: &ShardedCache<usize>,
    operations: usize,
    workers: usize,
) -> Result<PhaseReport> {
    ensure_workers(workers)?;
    let start = Instant::now();

    let hits = thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|worker| {
                scope.spawn(move || {
                    (worker..operations)
                        .step_by(workers)
                        .filter(|&i| cache.get(&bench_key(i)) == Some(i))
                        .count()
                })
            })
            .collect();

        handles.into_iter().try_fold(0usize, |total, handle| {
            handle
                .join()
                .map(|hits| total + hits)
                .map_err(|_| worker_panicked())
        })
    })?;

    Ok(PhaseReport {
        operations,
        hits,
        elapsed: start.elapsed(),
    })
}

/// Runs the Set phase then the Get phase against `cache`.
///
/// The Get phase only hits every key when `cache` starts out empty.
pub fn run(cache: &ShardedCache<usize>, config: &BenchConfig) -> Result<BenchReport> {
    info!(
        shards = cache.shard_count(),
        operations = config.operations,
        workers = config.workers,
        "Starting benchmark"
    );

    let set = run_set_phase(cache, config.operations, config.workers, config.ttl)?;
    info!(
        "Set benchmark for {} requests: {:?}",
        set.operations, set.elapsed
    );

    let get = run_get_phase(cache, config.operations, config.workers)?;
    info!(
        "Get benchmark for {} requests: {:?} ({} hits)",
        get.operations, get.elapsed, get.hits
    );

    Ok(BenchReport { set, get })
}

fn ensure_workers(workers: usize) -> Result<()> {
    if workers == 0 {
        return Err(CacheError::InvalidConfig(
            "benchmark needs at least one worker".to_string(),
        ));
    }
    Ok(())
}

fn worker_panicked() -> CacheError {
    CacheError::Internal("benchmark worker panicked".to_string())
}
