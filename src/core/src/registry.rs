//! Lazy keyed-singleton registry
//!
//! Maps a string key to a value that is constructed at most once, on first
//! access, by a caller-supplied factory. The same shape recurs across the
//! system: named cache backends, named storage disks, per-domain policy
//! engines. Implemented once here with an explicit read/write lock rather
//! than per-key lazy cells, so the creation of the synchronization state
//! itself cannot race.

use std::collections::HashMap;
use std::future::Future;

use tokio::sync::RwLock;
use tracing::debug;

/// A registry of named singletons with pluggable factories.
///
/// Values must be cheap to clone; in practice they are `Arc`s over the
/// actual service object, so every caller for a key observes the identical
/// instance.
///
/// # Locking discipline
///
/// `get_or_try_init` uses double-checked locking:
///
/// 1. Optimistic lookup under the read lock (the hot path takes no
///    exclusive lock).
/// 2. On miss, acquire the write lock and re-check the map. Another task
///    may have finished construction while this one waited; a read lock
///    cannot be upgraded in place, so the re-check is what keeps two
///    missing readers from both constructing.
/// 3. Run the factory while still holding the write lock, then publish.
///
/// Construction is therefore serialized across the whole registry. A failed
/// factory inserts nothing; the next caller retries from scratch.
pub struct KeyedRegistry<T: Clone> {
    entries: RwLock<HashMap<String, T>>,
}

impl<T: Clone> KeyedRegistry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Look up an existing value without constructing anything.
    pub async fn get(&self, key: &str) -> Option<T> {
        let entries = self.entries.read().await;
        entries.get(key).cloned()
    }

    /// Return the value for `key`, constructing it with `init` if absent.
    ///
    /// At most one factory invocation per key ever runs, and all callers
    /// receive a clone of the single constructed value. If `init` fails the
    /// error is returned and no entry is stored.
    pub async fn get_or_try_init<F, Fut, E>(&self, key: &str, init: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        // First check: read lock only
        {
            let entries = self.entries.read().await;
            if let Some(value) = entries.get(key) {
                return Ok(value.clone());
            }
        }

        // Miss: take the write lock and re-check before constructing
        let mut entries = self.entries.write().await;
        if let Some(value) = entries.get(key) {
            debug!("registry entry for '{}' created by another task", key);
            return Ok(value.clone());
        }

        debug!("constructing registry entry for '{}'", key);
        let value = init().await?;
        entries.insert(key.to_string(), value.clone());

        Ok(value)
    }

    /// Insert a pre-built value, replacing any existing entry.
    pub async fn insert(&self, key: impl Into<String>, value: T) {
        let mut entries = self.entries.write().await;
        entries.insert(key.into(), value);
    }

    /// Whether an entry exists for `key`.
    pub async fn contains(&self, key: &str) -> bool {
        let entries = self.entries.read().await;
        entries.contains_key(key)
    }

    /// Number of constructed entries.
    pub async fn len(&self) -> usize {
        let entries = self.entries.read().await;
        entries.len()
    }

    /// Whether the registry holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// The keys of all constructed entries.
    pub async fn keys(&self) -> Vec<String> {
        let entries = self.entries.read().await;
        entries.keys().cloned().collect()
    }
}

impl<T: Clone> Default for KeyedRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
