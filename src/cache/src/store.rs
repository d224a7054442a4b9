//! Cache store capability trait

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

/// A byte-valued cache backend
///
/// Values are raw bytes; callers serialize their own types. An expired or
/// absent key reads as `None`, never as an error.
#[async_trait]
pub trait CacheStore: Send + Sync + std::fmt::Debug {
    /// Fetch a value, or `None` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store a value. `ttl` overrides the store's default expiry;
    /// `None` falls back to it.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()>;

    /// Remove a key; removing an absent key is a no-op.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Drop every entry in the store.
    async fn clear(&self) -> Result<()>;
}
