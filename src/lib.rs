//! shardcache - A sharded in-memory key/value cache
//!
//! Keys are routed by FNV-1a hash onto a fixed array of independently locked
//! shards. Entries carry a TTL and expire lazily on read.

pub mod bench;
pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{CacheStats, ShardedCache};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::spawn_sweep_task;
