//! Named disk manager
//!
//! Config-driven driver selection with at-most-once construction per disk
//! name. The manager owns its registry instead of sharing a process-wide
//! singleton map, so tests can run independent instances side by side.

use std::collections::HashMap;
use std::sync::Arc;

use domainguard_core::KeyedRegistry;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::disk::BlobStore;
use crate::error::{Result, StorageError};
use crate::local::LocalDisk;

/// Disk name used when the configured default is empty
pub const DEFAULT_DISK: &str = "local";

fn default_root() -> String {
    "./data/storage".to_string()
}

/// The `[filesystem]` configuration section
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FilesystemConfig {
    /// Disk used when callers don't name one; falls back to "local"
    #[serde(default)]
    pub default: String,

    /// Named disk configurations
    #[serde(default)]
    pub disks: HashMap<String, DiskConfig>,
}

impl FilesystemConfig {
    /// The effective default disk name.
    pub fn default_disk(&self) -> &str {
        if self.default.is_empty() {
            DEFAULT_DISK
        } else {
            &self.default
        }
    }
}

/// One named disk
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DiskConfig {
    /// Driver name ("local")
    pub driver: String,

    /// Base directory for the local driver
    #[serde(default = "default_root")]
    pub root: String,
}

/// Hands out named disks, constructing each driver at most once
pub struct DiskManager {
    config: FilesystemConfig,
    disks: KeyedRegistry<Arc<dyn BlobStore>>,
}

impl DiskManager {
    /// Create a manager over the `[filesystem]` section.
    pub fn new(config: FilesystemConfig) -> Self {
        Self {
            config,
            disks: KeyedRegistry::new(),
        }
    }

    /// The configured default disk.
    pub async fn default_disk(&self) -> Result<Arc<dyn BlobStore>> {
        self.disk(self.config.default_disk()).await
    }

    /// The disk registered under `name`, built on first use.
    pub async fn disk(&self, name: &str) -> Result<Arc<dyn BlobStore>> {
        self.disks
            .get_or_try_init(name, || async move {
                let Some(entry) = self.config.disks.get(name) else {
                    return Err(StorageError::UnknownDisk(name.to_string()));
                };

                info!("creating disk '{}' with driver {}", name, entry.driver);
                match entry.driver.as_str() {
                    "local" => Ok(Arc::new(LocalDisk::new(&entry.root)) as Arc<dyn BlobStore>),
                    other => Err(StorageError::UnknownDriver(other.to_string())),
                }
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(root: &str) -> FilesystemConfig {
        toml::from_str(&format!(
            r#"
default = "local"

[disks.local]
driver = "local"
root = "{root}"

[disks.exotic]
driver = "s3"
"#
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn test_same_name_returns_same_instance() {
        let dir = tempfile::tempdir().unwrap();
        let manager = DiskManager::new(config(&dir.path().to_string_lossy()));

        let first = manager.disk("local").await.unwrap();
        let second = manager.disk("local").await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let by_default = manager.default_disk().await.unwrap();
        assert!(Arc::ptr_eq(&first, &by_default));
    }

    #[tokio::test]
    async fn test_unknown_disk_and_driver_fail() {
        let dir = tempfile::tempdir().unwrap();
        let manager = DiskManager::new(config(&dir.path().to_string_lossy()));

        assert!(matches!(
            manager.disk("missing").await.unwrap_err(),
            StorageError::UnknownDisk(name) if name == "missing"
        ));
        assert!(matches!(
            manager.disk("exotic").await.unwrap_err(),
            StorageError::UnknownDriver(driver) if driver == "s3"
        ));
    }

    #[tokio::test]
    async fn test_default_disk_falls_back_to_local() {
        let config = FilesystemConfig::default();
        assert_eq!(config.default_disk(), "local");

        // No [disks.local] entry configured, so resolution still fails
        let manager = DiskManager::new(config);
        assert!(matches!(
            manager.default_disk().await.unwrap_err(),
            StorageError::UnknownDisk(_)
        ));
    }

    #[tokio::test]
    async fn test_disk_round_trip_through_manager() {
        let dir = tempfile::tempdir().unwrap();
        let manager = DiskManager::new(config(&dir.path().to_string_lossy()));

        let disk = manager.disk("local").await.unwrap();
        disk.put("reports/q3.txt", b"fine").await.unwrap();

        let again = manager.disk("local").await.unwrap();
        assert_eq!(
            again.get("reports/q3.txt").await.unwrap(),
            Some(b"fine".to_vec())
        );
    }
}
