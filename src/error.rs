//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache and its benchmark driver.
///
/// The cache operations themselves never fail; these variants cover
/// construction and benchmark execution.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Invalid cache or benchmark configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
