//! Error types for the cache subsystem

use thiserror::Error;

/// Cache subsystem errors
#[derive(Debug, Error)]
pub enum CacheError {
    /// Store name missing from the `[cache]` configuration
    #[error("cache store '{0}' not found")]
    UnknownStore(String),

    /// Configured driver name has no implementation
    #[error("unsupported cache driver: {0}")]
    UnknownDriver(String),

    /// Driver-level failure
    #[error("cache backend error: {0}")]
    Backend(String),

    /// Typed-cache payload failed to encode or decode
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Result type for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;
