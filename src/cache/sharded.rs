//! Sharded Cache Module
//!
//! Main cache engine: a fixed array of independently locked shards with
//! lazy TTL expiration applied on read.

use tracing::{debug, info};

use crate::cache::routing::shard_index;
use crate::cache::shard::Shard;
use crate::cache::{CacheStats, DEFAULT_SHARD_COUNT};
use crate::config::Config;
use crate::error::{CacheError, Result};

// == Sharded Cache ==
/// Concurrent key/value cache partitioned across a fixed number of shards.
///
/// Every operation touches exactly one shard, chosen by hashing the key, so
/// operations on keys in different shards never contend for the same lock.
/// The shard array itself is immutable after construction.
#[derive(Debug)]
pub struct ShardedCache<V> {
    /// Shards, indexed by [`shard_index`]
    shards: Box<[Shard<V>]>,
}

impl<V> ShardedCache<V> {
    // == Constructor ==
    /// Creates a cache with `shard_count` empty shards.
    ///
    /// Returns an error if `shard_count` is zero.
    pub fn new(shard_count: usize) -> Result<Self> {
        if shard_count == 0 {
            return Err(CacheError::InvalidConfig(
                "shard count must be greater than 0".to_string(),
            ));
        }

        let shards = (0..shard_count).map(|_| Shard::new()).collect();
        Ok(Self { shards })
    }

    /// Creates a cache sized from the configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.shard_count)
    }

    // == Routing ==
    /// Returns the number of shards.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Returns the index of the shard that owns `key`.
    pub fn shard_of(&self, key: &str) -> usize {
        shard_index(key, self.shards.len())
    }

    fn shard(&self, key: &str) -> &Shard<V> {
        &self.shards[self.shard_of(key)]
    }

    #[cfg(test)]
    pub(crate) fn shard_at(&self, index: usize) -> &Shard<V> {
        &self.shards[index]
    }

    // == Set ==
    /// Stores `value` under `key`, expiring `ttl_seconds` from now.
    ///
    /// Overwrites any previous entry for the key. A zero or negative TTL is
    /// accepted and produces an entry the next read treats as expired.
    pub fn set(&self, key: &str, value: V, ttl_seconds: i64) {
        self.shard(key).insert(key, value, ttl_seconds);
    }

    // == Clear ==
    /// Empties every shard.
    ///
    /// Each shard is reset atomically, but the cache as a whole is not:
    /// a concurrent reader may observe some shards cleared and others not.
    pub fn clear(&self) {
        for shard in self.shards.iter() {
            shard.clear();
        }
        info!(shards = self.shards.len(), "cache cleared");
    }

    // == Purge Expired ==
    /// Removes stale entries from every shard, one shard lock at a time.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        let removed: usize = self.shards.iter().map(Shard::purge_expired).sum();
        debug!(removed, "purged expired entries");
        removed
    }

    // == Length ==
    /// Returns the number of stored entries, including stale ones not yet
    /// reclaimed.
    pub fn len(&self) -> usize {
        self.shards.iter().map(Shard::len).sum()
    }

    /// Returns true if no shard stores any entry.
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(Shard::is_empty)
    }

    // == Stats ==
    /// Returns aggregated statistics across all shards.
    pub fn stats(&self) -> CacheStats {
        let mut stats = CacheStats::new(self.shards.len());
        for shard in self.shards.iter() {
            let (hits, misses, expirations) = shard.counters();
            stats.absorb(hits, misses, expirations, shard.len());
        }
        stats
    }
}

impl<V: Clone> ShardedCache<V> {
    // == Get ==
    /// Returns the value stored under `key` if present and not expired.
    ///
    /// An expired entry is reported as absent and removed from its shard.
    pub fn get(&self, key: &str) -> Option<V> {
        self.shard(key).get(key)
    }
}

impl<V> Default for ShardedCache<V> {
    fn default() -> Self {
        Self {
            shards: (0..DEFAULT_SHARD_COUNT).map(|_| Shard::new()).collect(),
        }
    }
}
