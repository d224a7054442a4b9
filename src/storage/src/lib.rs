//! # Domainguard Storage
//!
//! Named storage disks over the lazy keyed-singleton registry. Each disk
//! name in the `[filesystem]` config section maps to exactly one driver
//! instance, constructed on first use.

pub mod disk;
pub mod error;
pub mod local;
pub mod manager;

pub use disk::BlobStore;
pub use error::{Result, StorageError};
pub use local::LocalDisk;
pub use manager::{DiskConfig, DiskManager, FilesystemConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
