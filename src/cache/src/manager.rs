//! Named cache store manager
//!
//! Config-driven driver selection with at-most-once construction per store
//! name, built on the shared [`KeyedRegistry`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use domainguard_core::KeyedRegistry;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CacheError, Result};
use crate::memory::MemoryStore;
use crate::store::CacheStore;

/// The `[cache]` configuration section
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Store used when callers don't name one
    #[serde(default)]
    pub default: String,

    /// Named store configurations
    #[serde(default)]
    pub stores: HashMap<String, StoreConfig>,
}

/// One named cache store
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Driver name ("memory")
    pub driver: String,

    /// Default entry TTL in seconds; absent means entries never expire
    #[serde(default)]
    pub ttl_secs: Option<u64>,
}

impl StoreConfig {
    fn default_ttl(&self) -> Option<Duration> {
        self.ttl_secs.map(Duration::from_secs)
    }
}

/// Hands out named cache stores, constructing each at most once
pub struct CacheManager {
    config: CacheConfig,
    stores: KeyedRegistry<Arc<dyn CacheStore>>,
}

impl CacheManager {
    /// Create a manager over the `[cache]` section.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            stores: KeyedRegistry::new(),
        }
    }

    /// The configured default store.
    pub async fn default_store(&self) -> Result<Arc<dyn CacheStore>> {
        self.store(&self.config.default).await
    }

    /// The store registered under `name`, built on first use.
    ///
    /// Concurrent first callers race on the registry, which guarantees a
    /// single driver construction; everyone gets the same instance.
    pub async fn store(&self, name: &str) -> Result<Arc<dyn CacheStore>> {
        self.stores
            .get_or_try_init(name, || async move {
                let Some(entry) = self.config.stores.get(name) else {
                    return Err(CacheError::UnknownStore(name.to_string()));
                };

                info!("creating cache store '{}' with driver {}", name, entry.driver);
                match entry.driver.as_str() {
                    "memory" => {
                        Ok(Arc::new(MemoryStore::new(entry.default_ttl())) as Arc<dyn CacheStore>)
                    }
                    other => Err(CacheError::UnknownDriver(other.to_string())),
                }
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CacheConfig {
        toml::from_str(
            r#"
default = "memory"

[stores.memory]
driver = "memory"
ttl_secs = 60

[stores.sessions]
driver = "memory"

[stores.misconfigured]
driver = "redis"
"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_same_name_returns_same_instance() {
        let manager = CacheManager::new(config());

        let first = manager.store("memory").await.unwrap();
        let second = manager.store("memory").await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let sessions = manager.store("sessions").await.unwrap();
        assert!(!Arc::ptr_eq(&first, &sessions));
    }

    #[tokio::test]
    async fn test_default_store_resolves_config_default() {
        let manager = CacheManager::new(config());

        let by_default = manager.default_store().await.unwrap();
        let by_name = manager.store("memory").await.unwrap();
        assert!(Arc::ptr_eq(&by_default, &by_name));
    }

    #[tokio::test]
    async fn test_unknown_store_and_driver_fail() {
        let manager = CacheManager::new(config());

        assert!(matches!(
            manager.store("missing").await.unwrap_err(),
            CacheError::UnknownStore(name) if name == "missing"
        ));
        assert!(matches!(
            manager.store("misconfigured").await.unwrap_err(),
            CacheError::UnknownDriver(driver) if driver == "redis"
        ));

        // A failed lookup caches nothing; the store stays absent
        assert!(manager.store("missing").await.is_err());
    }

    #[tokio::test]
    async fn test_store_round_trip() {
        let manager = CacheManager::new(config());
        let store = manager.store("sessions").await.unwrap();

        store.set("user:1", b"alice".to_vec(), None).await.unwrap();
        assert_eq!(store.get("user:1").await.unwrap(), Some(b"alice".to_vec()));

        // The same instance is visible through a second lookup
        let again = manager.store("sessions").await.unwrap();
        assert_eq!(again.get("user:1").await.unwrap(), Some(b"alice".to_vec()));
    }
}
