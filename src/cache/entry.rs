//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// Represents a single cache entry with value and expiry instant.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: i64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry expiring `ttl_seconds` from now.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl_seconds` - TTL in seconds; zero or negative yields an entry
    ///   that is already stale
    pub fn new(value: V, ttl_seconds: i64) -> Self {
        Self::with_now(value, ttl_seconds, current_timestamp_ms())
    }

    /// Creates a new cache entry relative to an explicit `now`.
    pub fn with_now(value: V, ttl_seconds: i64, now_ms: i64) -> Self {
        Self {
            value,
            expires_at: expiry_deadline(now_ms, ttl_seconds),
        }
    }

    // == Is Expired ==
    /// Checks staleness against `now_ms` (Unix milliseconds).
    ///
    /// An entry stays visible while the current time is less than or equal to
    /// its expiration time and is stale strictly after it.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms > self.expires_at
    }
}

// == Utility Functions ==
/// Computes the expiry instant for a TTL applied at `now_ms`.
///
/// Non-positive TTLs land strictly before `now_ms` so the next read misses.
pub fn expiry_deadline(now_ms: i64, ttl_seconds: i64) -> i64 {
    let ttl_ms = ttl_seconds.saturating_mul(1000);
    let deadline = now_ms.saturating_add(ttl_ms);
    if ttl_ms > 0 {
        deadline
    } else {
        deadline.saturating_sub(1)
    }
}

/// Returns current Unix timestamp in milliseconds.
///
/// A clock set before the epoch reads as 0.
pub fn current_timestamp_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
