//! Photo storage port.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during photo storage operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("Photo not found: {0}")]
    NotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Signed URL is invalid")]
    InvalidSignature,

    #[error("Signed URL has expired")]
    Expired,

    #[error("IO error: {0}")]
    Io(String),
}

/// Object storage for seasoning photos.
#[async_trait]
pub trait PhotoStorage: Send + Sync {
    /// Store bytes under a relative path such as `{session}/{seasoning}_{millis}.jpg`.
    async fn upload(&self, path: &str, bytes: &[u8], content_type: &str)
        -> Result<(), StorageError>;

    /// A read URL for the path valid for `ttl_secs` seconds.
    fn signed_url(&self, path: &str, ttl_secs: i64) -> Result<String, StorageError>;

    /// Reads a photo through a signed URL's `expires` and `signature` parameters.
    async fn open_signed(
        &self,
        path: &str,
        expires: i64,
        signature: &str,
    ) -> Result<Vec<u8>, StorageError>;
}

/// Builds the storage path of a seasoning photo.
pub fn photo_path(session_id: &impl std::fmt::Display, seasoning_id: &str, millis: i64) -> String {
    format!("{}/{}_{}.jpg", session_id, seasoning_id, millis)
}
