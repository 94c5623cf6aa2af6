//! Webhook signature verification.
//!
//! LINE signs each webhook body with HMAC-SHA256 keyed by the channel secret
//! and sends the base64 digest in `x-line-signature`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

pub const SIGNATURE_HEADER: &str = "x-line-signature";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("Missing signature header")]
    Missing,

    #[error("Signature is not valid base64")]
    Malformed,

    #[error("Signature mismatch")]
    Mismatch,

    #[error("Invalid channel secret: {0}")]
    InvalidKey(String),
}

#[derive(Clone)]
pub struct SignatureVerifier {
    channel_secret: SecretString,
}

impl SignatureVerifier {
    pub fn new(channel_secret: SecretString) -> Self {
        Self { channel_secret }
    }

    fn digest(&self, body: &[u8]) -> Result<Vec<u8>, SignatureError> {
        let mut mac =
            Hmac::<Sha256>::new_from_slice(self.channel_secret.expose_secret().as_bytes())
                .map_err(|e| SignatureError::InvalidKey(e.to_string()))?;
        mac.update(body);
        Ok(mac.finalize().into_bytes().to_vec())
    }

    /// Computes the header value for a body.
    pub fn sign(&self, body: &[u8]) -> Result<String, SignatureError> {
        Ok(STANDARD.encode(self.digest(body)?))
    }

    /// Verifies the header value against the raw request body.
    pub fn verify(&self, body: &[u8], signature: Option<&str>) -> Result<(), SignatureError> {
        let signature = signature
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(SignatureError::Missing)?;
        let provided = STANDARD
            .decode(signature)
            .map_err(|_| SignatureError::Malformed)?;
        let expected = self.digest(body)?;

        if expected.ct_eq(&provided).unwrap_u8() != 1 {
            return Err(SignatureError::Mismatch);
        }
        Ok(())
    }
}

impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verifier() -> SignatureVerifier {
        SignatureVerifier::new(SecretString::new("channel-secret".to_string()))
    }

    #[test]
    fn signed_body_verifies() {
        let body = br#"{"events":[]}"#;
        let signature = verifier().sign(body).unwrap();

        assert!(verifier().verify(body, Some(&signature)).is_ok());
    }

    #[test]
    fn modified_body_is_rejected() {
        let signature = verifier().sign(br#"{"events":[]}"#).unwrap();

        assert_eq!(
            verifier().verify(br#"{"events":[{}]}"#, Some(&signature)),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn other_secret_is_rejected() {
        let body = b"payload";
        let signature = SignatureVerifier::new(SecretString::new("other".to_string()))
            .sign(body)
            .unwrap();

        assert_eq!(
            verifier().verify(body, Some(&signature)),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn missing_or_blank_header_is_rejected() {
        assert_eq!(verifier().verify(b"x", None), Err(SignatureError::Missing));
        assert_eq!(verifier().verify(b"x", Some("  ")), Err(SignatureError::Missing));
    }

    #[test]
    fn non_base64_header_is_rejected() {
        assert_eq!(
            verifier().verify(b"x", Some("%%%")),
            Err(SignatureError::Malformed)
        );
    }
}
