//! Typed wrapper over a byte-valued cache store
//!
//! Stores are byte-valued; this wrapper round-trips any serde type through
//! JSON so callers keep type safety without every store driver knowing
//! about payload shapes.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::store::CacheStore;

/// Type-safe view over a [`CacheStore`]
pub struct TypedCache<T> {
    store: Arc<dyn CacheStore>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> TypedCache<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Wrap a raw store.
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    /// Fetch and decode a value.
    pub async fn get(&self, key: &str) -> Result<Option<T>> {
        match self.store.get(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Encode and store a value.
    pub async fn set(&self, key: &str, value: &T, ttl: Option<Duration>) -> Result<()> {
        let bytes = serde_json::to_vec(value)?;
        self.store.set(key, bytes, ttl).await
    }

    /// Remove a key.
    pub async fn delete(&self, key: &str) -> Result<()> {
        self.store.delete(key).await
    }

    /// Drop every entry in the underlying store.
    pub async fn clear(&self) -> Result<()> {
        self.store.clear().await
    }
}
