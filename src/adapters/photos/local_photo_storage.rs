//! Local filesystem photo storage.
//!
//! Photos live under `{root}/{session_id}/{seasoning_id}_{millis}.jpg`.
//! Writes go to a temp file that is renamed into place, so a crash never
//! leaves a partial photo behind.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::url_signer::{validate_path, UrlSigner};
use crate::ports::{PhotoStorage, StorageError};

/// Maximum accepted photo size (10 MB).
const MAX_PHOTO_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct LocalPhotoStorage {
    root: PathBuf,
    signer: UrlSigner,
}

impl LocalPhotoStorage {
    pub fn new(root: impl Into<PathBuf>, signer: UrlSigner) -> Self {
        Self {
            root: root.into(),
            signer,
        }
    }

    fn full_path(&self, path: &str) -> Result<PathBuf, StorageError> {
        validate_path(path)?;
        Ok(self.root.join(path))
    }
}

#[async_trait]
impl PhotoStorage for LocalPhotoStorage {
    async fn upload(
        &self,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError> {
        if bytes.len() > MAX_PHOTO_BYTES {
            return Err(StorageError::Io(format!(
                "Photo too large: {} bytes (max {})",
                bytes.len(),
                MAX_PHOTO_BYTES
            )));
        }

        let final_path = self.full_path(path)?;
        if let Some(dir) = final_path.parent() {
            fs::create_dir_all(dir).await.map_err(|e| {
                StorageError::Io(format!("Failed to create {}: {}", dir.display(), e))
            })?;
        }

        let temp_path = final_path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).await.map_err(|e| {
            StorageError::Io(format!("Failed to create {}: {}", temp_path.display(), e))
        })?;
        file.write_all(bytes).await.map_err(|e| {
            StorageError::Io(format!("Failed to write {}: {}", temp_path.display(), e))
        })?;
        file.sync_all().await.map_err(|e| {
            StorageError::Io(format!("Failed to sync {}: {}", temp_path.display(), e))
        })?;
        fs::rename(&temp_path, &final_path).await.map_err(|e| {
            StorageError::Io(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                final_path.display(),
                e
            ))
        })?;

        tracing::debug!(path, content_type, size = bytes.len(), "Stored photo");
        Ok(())
    }

    fn signed_url(&self, path: &str, ttl_secs: i64) -> Result<String, StorageError> {
        self.signer.signed_url(path, ttl_secs)
    }

    async fn open_signed(
        &self,
        path: &str,
        expires: i64,
        signature: &str,
    ) -> Result<Vec<u8>, StorageError> {
        let full_path = self.full_path(path)?;
        self.signer.verify(path, expires, signature)?;

        fs::read(&full_path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound(path.to_string()),
            _ => StorageError::Io(format!("Failed to read {}: {}", full_path.display(), e)),
        })
    }
}
