//! Local filesystem disk driver

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::disk::BlobStore;
use crate::error::{Result, StorageError};

/// Blob store over a directory tree
///
/// Keys map to paths below the base directory. Keys that would escape the
/// root (absolute paths, `..` components) are rejected before any I/O.
#[derive(Debug)]
pub struct LocalDisk {
    root: PathBuf,
}

impl LocalDisk {
    /// Create a disk rooted at `root`. The directory is created lazily on
    /// the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The disk's base directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey("empty key".to_string()));
        }

        let relative = Path::new(key);
        for component in relative.components() {
            match component {
                Component::Normal(_) => {}
                _ => {
                    return Err(StorageError::InvalidKey(format!(
                        "key '{}' must stay below the disk root",
                        key
                    )))
                }
            }
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BlobStore for LocalDisk {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.resolve(key)?;

        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        let path = self.resolve(key)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        debug!("writing {} bytes to {}", value.len(), path.display());
        tokio::fs::write(&path, value).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let path = self.resolve(key)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let path = self.resolve(key)?;
        Ok(tokio::fs::try_exists(&path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_delete_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let disk = LocalDisk::new(dir.path());

        disk.put("uploads/avatar.png", b"png-bytes").await.unwrap();
        assert!(disk.exists("uploads/avatar.png").await.unwrap());
        assert_eq!(
            disk.get("uploads/avatar.png").await.unwrap(),
            Some(b"png-bytes".to_vec())
        );

        disk.delete("uploads/avatar.png").await.unwrap();
        assert!(!disk.exists("uploads/avatar.png").await.unwrap());
        assert_eq!(disk.get("uploads/avatar.png").await.unwrap(), None);

        // Deleting again is a no-op
        disk.delete("uploads/avatar.png").await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_key_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let disk = LocalDisk::new(dir.path());
        assert_eq!(disk.get("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_escaping_keys_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let disk = LocalDisk::new(dir.path());

        for key in ["../secrets", "/etc/passwd", "a/../../b", ""] {
            let err = disk.put(key, b"x").await.unwrap_err();
            assert!(matches!(err, StorageError::InvalidKey(_)), "key: {key:?}");
        }
    }

    #[tokio::test]
    async fn test_overwrite_replaces_value() {
        let dir = tempfile::tempdir().unwrap();
        let disk = LocalDisk::new(dir.path());

        disk.put("k", b"old").await.unwrap();
        disk.put("k", b"new").await.unwrap();
        assert_eq!(disk.get("k").await.unwrap(), Some(b"new".to_vec()));
    }
}
