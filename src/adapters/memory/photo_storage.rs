//! In-memory photo storage with real signed links.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::adapters::photos::{validate_path, UrlSigner};
use crate::ports::{PhotoStorage, StorageError};

#[derive(Debug, Default)]
struct Inner {
    photos: HashMap<String, (Vec<u8>, String)>,
    fail_uploads: bool,
}

#[derive(Debug, Clone)]
pub struct InMemoryPhotoStorage {
    inner: Arc<RwLock<Inner>>,
    signer: UrlSigner,
}

impl InMemoryPhotoStorage {
    pub fn new(signer: UrlSigner) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
            signer,
        }
    }

    pub async fn fail_uploads(&self, fail: bool) {
        self.inner.write().await.fail_uploads = fail;
    }

    pub async fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.inner.read().await.photos.keys().cloned().collect();
        paths.sort();
        paths
    }
}

#[async_trait]
impl PhotoStorage for InMemoryPhotoStorage {
    async fn upload(
        &self,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError> {
        validate_path(path)?;
        let mut inner = self.inner.write().await;
        if inner.fail_uploads {
            return Err(StorageError::Io("uploads disabled".to_string()));
        }
        inner
            .photos
            .insert(path.to_string(), (bytes.to_vec(), content_type.to_string()));
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
        validate_path(path)?;
        self.signer.verify(path, expires, signature)?;
        self.inner
            .read()
            .await
            .photos
            .get(path)
            .map(|(bytes, _)| bytes.clone())
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }
}
