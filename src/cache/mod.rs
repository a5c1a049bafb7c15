//! Cache Module
//!
//! Provides a sharded in-memory cache with lazy TTL expiration.

mod entry;
mod routing;
mod shard;
mod sharded;
mod stats;


// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use routing::{hash_key, shard_index};
pub use shard::Shard;
pub use sharded::ShardedCache;
pub use stats::CacheStats;

// == Public Constants ==
/// Shard count used when none is configured
pub const DEFAULT_SHARD_COUNT: usize = 256;
