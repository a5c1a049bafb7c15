//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside the cache.
//!
//! # Tasks
//! - Expiry sweep: reclaims stale entries that are never read again

mod sweep;

pub use sweep::spawn_sweep_task;
