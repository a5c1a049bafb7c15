//! Cache Statistics Module
//!
//! Point-in-time snapshot of hits, misses and lazy expirations across shards.

use serde::Serialize;

// == Cache Stats ==
/// Aggregated cache performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (key absent or expired)
    pub misses: u64,
    /// Number of stale entries removed on read or by a sweep
    pub expirations: u64,
    /// Entries physically stored, including stale ones not yet reclaimed
    pub total_entries: usize,
    /// Number of shards in the cache
    pub shard_count: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new(shard_count: usize) -> Self {
        Self {
            shard_count,
            ..Self::default()
        }
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Folds one shard's counters into the snapshot.
    pub(crate) fn absorb(&mut self, hits: u64, misses: u64, expirations: u64, entries: usize) {
        self.hits += hits;
        self.misses += misses;
        self.expirations += expirations;
        self.total_entries += entries;
    }
}
