//! Error types for the storage subsystem

use thiserror::Error;

/// Storage subsystem errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Disk name missing from the `[filesystem]` configuration
    #[error("disk '{0}' not found in filesystem config")]
    UnknownDisk(String),

    /// Configured driver name has no implementation
    #[error("unsupported storage driver: {0}")]
    UnknownDriver(String),

    /// Key escapes the disk root or is otherwise malformed
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;
