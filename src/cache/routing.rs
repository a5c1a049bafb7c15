//! Key Routing Module
//!
//! Maps keys onto shard indices with FNV-1a.

use std::hash::Hasher;

use fnv::FnvHasher;

/// Hashes the key's bytes with FNV-1a.
#[inline]
pub fn hash_key(key: &str) -> u64 {
    let mut hasher = FnvHasher::default();
    hasher.write(key.as_bytes());
    hasher.finish()
}

/// Selects the shard owning `key` in `[0, shard_count)`.
///
/// Pure function of the key and shard count, defined for every string
/// including the empty one. `shard_count` must be non-zero.
#[inline]
pub fn shard_index(key: &str, shard_count: usize) -> usize {
    (hash_key(key) % shard_count as u64) as usize
}
