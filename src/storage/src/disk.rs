//! Blob store capability trait

use async_trait::async_trait;

use crate::error::Result;

/// A byte-valued blob store addressed by string keys
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug {
    /// Fetch a blob, or `None` when the key does not exist.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store a blob, replacing any existing value.
    async fn put(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Remove a blob; removing an absent key is a no-op.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Whether a blob exists for the key.
    async fn exists(&self, key: &str) -> Result<bool>;
}
