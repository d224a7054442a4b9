//! # Domainguard Core
//!
//! Shared building blocks for the Domainguard service crates.
//!
//! The main export is [`KeyedRegistry`], a lazy keyed-singleton registry:
//! named values that are constructed at most once per key, even when many
//! tasks race on the first access. The cache store manager and the storage
//! disk manager are both built on it, and the authorization enforcer
//! manager follows the same locking discipline.

pub mod registry;

pub use registry::KeyedRegistry;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
