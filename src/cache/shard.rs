//! Cache Shard Module
//!
//! One independently locked partition of the key space.
//!
//! # Locking
//!
//! - Lookups take the shared lock; inserts, deletes and resets take the
//!   exclusive lock
//! - Counters are atomics updated outside the lock

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
#[cfg(test)]
use parking_lot::RwLockWriteGuard;
use tracing::debug;

use crate::cache::entry::{current_timestamp_ms, CacheEntry};

// == Shard ==
/// A single shard holding a subset of the cache's keys.
#[derive(Debug)]
pub struct Shard<V> {
    /// Key-value storage for this shard
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    /// Number of successful lookups
    hits: AtomicU64,
    /// Number of lookups that found nothing visible
    misses: AtomicU64,
    /// Number of stale entries removed
    expirations: AtomicU64,
}

impl<V> Default for Shard<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Shard<V> {
    // == Constructor ==
    /// Creates a new empty shard.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            expirations: AtomicU64::new(0),
        }
    }

    // == Insert ==
    /// Inserts or overwrites the entry for `key`.
    pub fn insert(&self, key: &str, value: V, ttl_seconds: i64) {
        let entry = CacheEntry::new(value, ttl_seconds);
        self.entries.write().insert(key.to_owned(), entry);
    }

    // == Remove If Expired ==
    /// Removes the entry under `key` only if it is stale right now.
    ///
    /// Staleness is re-checked under the exclusive lock, so an entry written
    /// after a reader saw the old one is never discarded here.
    pub fn remove_if_expired(&self, key: &str) -> bool {
        let now = current_timestamp_ms();
        let mut entries = self.entries.write();
        let stale = entries
            .get(key)
            .is_some_and(|entry| entry.is_expired_at(now));
        if stale {
            entries.remove(key);
            self.expirations.fetch_add(1, Ordering::Relaxed);
        }
        stale
    }

    // == Purge Expired ==
    /// Removes every stale entry in this shard, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = current_timestamp_ms();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - entries.len();
        self.expirations.fetch_add(removed as u64, Ordering::Relaxed);
        removed
    }

    // == Clear ==
    /// Replaces the shard's mapping with an empty one.
    pub fn clear(&self) {
        *self.entries.write() = HashMap::new();
    }

    // == Length ==
    /// Returns the number of physically stored entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if the shard stores no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Holds this shard's exclusive lock until the guard is dropped.
    #[cfg(test)]
    pub(crate) fn lock_exclusive(&self) -> RwLockWriteGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.entries.write()
    }

    /// Returns `(hits, misses, expirations)`.
    pub fn counters(&self) -> (u64, u64, u64) {
        (
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
            self.expirations.load(Ordering::Relaxed),
        )
    }
}

impl<V: Clone> Shard<V> {
    // == Get ==
    /// Returns a clone of the value under `key` if it is present and fresh.
    ///
    /// A stale entry is reported as absent, then deleted under the exclusive
    /// lock once the shared lock has been released.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = current_timestamp_ms();
        {
            let entries = self.entries.read();
            match entries.get(key) {
                Some(entry) if !entry.is_expired_at(now) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return Some(entry.value.clone());
                }
                Some(_) => {}
                None => {
                    self.misses.fetch_add(1, Ordering::Relaxed);
                    return None;
                }
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        if self.remove_if_expired(key) {
            debug!(key, "lazily removed expired entry");
        }
        None
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_shard_new() {
        let shard: Shard<u32> = Shard::new();
        assert!(shard.is_empty());
        assert_eq!(shard.len(), 0);
        assert_eq!(shard.counters(), (0, 0, 0));
    }

    #[test]
    fn test_shard_insert_and_get() {
        let shard = Shard::new();
        shard.insert("key1", "value1".to_string(), 60);

        assert_eq!(shard.get("key1"), Some("value1".to_string()));
        assert_eq!(shard.get("missing"), None);
        assert_eq!(shard.counters(), (1, 1, 0));
    }

    #[test]
    fn test_shard_overwrite() {
        let shard = Shard::new();
        shard.insert("key1", 1, 60);
        shard.insert("key1", 2, 60);

        assert_eq!(shard.get("key1"), Some(2));
        assert_eq!(shard.len(), 1);
    }

    #[test]
    fn test_stale_entry_is_lazily_removed() {
        let shard = Shard::new();
        shard.insert("gone", 1, -1);

        // Physically present until read
        assert_eq!(shard.len(), 1);
        assert_eq!(shard.get("gone"), None);
        assert_eq!(shard.len(), 0);
        assert_eq!(shard.counters(), (0, 1, 1));
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let shard = Shard::new();
        shard.insert("short", "v", 1);
        assert_eq!(shard.get("short"), Some("v"));

        sleep(Duration::from_millis(1100));

        assert_eq!(shard.get("short"), None);
        assert!(shard.is_empty());
    }

    #[test]
    fn test_remove_if_expired_keeps_fresh_entry() {
        let shard = Shard::new();
        shard.insert("key", "stale", -5);

        // A writer replaces the stale entry before the reader upgrades its lock
        shard.insert("key", "fresh", 60);

        assert!(!shard.remove_if_expired("key"));
        assert_eq!(shard.get("key"), Some("fresh"));
    }

    #[test]
    fn test_remove_if_expired_missing_key() {
        let shard: Shard<u8> = Shard::new();
        assert!(!shard.remove_if_expired("nothing"));
    }

    #[test]
    fn test_purge_expired() {
        let shard = Shard::new();
        shard.insert("a", 1, -1);
        shard.insert("b", 2, 0);
        shard.insert("c", 3, 60);

        assert_eq!(shard.purge_expired(), 2);
        assert_eq!(shard.len(), 1);
        assert_eq!(shard.get("c"), Some(3));
        assert_eq!(shard.counters().2, 2);
    }

    #[test]
    fn test_clear() {
        let shard = Shard::new();
        shard.insert("a", 1, 60);
        shard.insert("b", 2, 60);

        shard.clear();

        assert!(shard.is_empty());
        assert_eq!(shard.get("a"), None);
    }
}
