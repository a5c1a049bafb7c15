//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::cache::DEFAULT_SHARD_COUNT;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of shards the cache is partitioned into
    pub shard_count: usize,
    /// Periodic sweep interval in seconds, 0 disables the sweep
    pub sweep_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SHARD_COUNT` - Number of cache shards (default: 256)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds, 0 = off (default: 0)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            shard_count: env_or("SHARD_COUNT", defaults.shard_count),
            sweep_interval: env_or("SWEEP_INTERVAL", defaults.sweep_interval),
        }
    }

    /// Returns the sweep interval, or None when the sweep is disabled.
    pub fn sweep_interval(&self) -> Option<u64> {
        (self.sweep_interval > 0).then_some(self.sweep_interval)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shard_count: DEFAULT_SHARD_COUNT,
            sweep_interval: 0,
        }
    }
}

/// Reads and parses an environment variable, falling back to `default`
/// when it is unset or unparseable.
pub(crate) fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
