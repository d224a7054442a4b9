//! # Domainguard Cache
//!
//! Named cache backends over the lazy keyed-singleton registry. Each store
//! name in the `[cache]` config section maps to exactly one driver
//! instance, constructed on first use; every caller asking for the same
//! store name observes the identical instance.

pub mod error;
pub mod manager;
pub mod memory;
pub mod store;
pub mod typed;

pub use error::{CacheError, Result};
pub use manager::{CacheConfig, CacheManager, StoreConfig};
pub use memory::MemoryStore;
pub use store::CacheStore;
pub use typed::TypedCache;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
