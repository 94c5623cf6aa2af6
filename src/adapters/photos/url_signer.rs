//! HMAC-signed, time-limited photo links.
//!
//! A link is `{base}/photos/{path}?expires={unix_secs}&signature={hex}` where
//! the signature is HMAC-SHA256 over `"{path}:{expires}"`.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::domain::foundation::Timestamp;
use crate::ports::StorageError;

type HmacSha256 = Hmac<Sha256>;

#[derive(Clone)]
pub struct UrlSigner {
    key: SecretString,
    public_base_url: String,
}

impl UrlSigner {
    pub fn new(key: SecretString, public_base_url: impl Into<String>) -> Self {
        Self {
            key,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn mac(&self, path: &str, expires: i64) -> Result<HmacSha256, StorageError> {
        let mut mac = HmacSha256::new_from_slice(self.key.expose_secret().as_bytes())
            .map_err(|e| StorageError::Io(format!("Invalid signing key: {}", e)))?;
        mac.update(format!("{}:{}", path, expires).as_bytes());
        Ok(mac)
    }

    pub fn sign(&self, path: &str, expires: i64) -> Result<String, StorageError> {
        Ok(hex::encode(self.mac(path, expires)?.finalize().into_bytes()))
    }

    /// Builds a link valid for `ttl_secs` from now.
    pub fn signed_url(&self, path: &str, ttl_secs: i64) -> Result<String, StorageError> {
        validate_path(path)?;
        let expires = Timestamp::now().as_unix_secs() + ttl_secs;
        let signature = self.sign(path, expires)?;
        Ok(format!(
            "{}/photos/{}?expires={}&signature={}",
            self.public_base_url, path, expires, signature
        ))
    }

    /// Checks signature first, then expiry.
    pub fn verify(&self, path: &str, expires: i64, signature: &str) -> Result<(), StorageError> {
        let provided = hex::decode(signature).map_err(|_| StorageError::InvalidSignature)?;
        let expected = self.mac(path, expires)?.finalize().into_bytes();

        if expected.as_slice().ct_eq(&provided).unwrap_u8() != 1 {
            return Err(StorageError::InvalidSignature);
        }
        if Timestamp::now().as_unix_secs() > expires {
            return Err(StorageError::Expired);
        }
        Ok(())
    }
}

impl std::fmt::Debug for UrlSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlSigner")
            .field("public_base_url", &self.public_base_url)
            .finish_non_exhaustive()
    }
}

/// Accepts relative `segment/segment` paths only.
pub fn validate_path(path: &str) -> Result<(), StorageError> {
    let invalid = path.is_empty()
        || path.starts_with('/')
        || path.contains('\\')
        || path
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..");
    if invalid {
        return Err(StorageError::InvalidPath(path.to_string()));
    }
    Ok(())
}
