//! Photo storage configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;
use super::line::check_base_url;
use super::server::Environment;

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding `photos/{session}/{seasoning}_{millis}.jpg`
    #[serde(default = "default_photo_root")]
    pub photo_root: PathBuf,

    /// Origin prepended to signed photo links
    pub public_base_url: String,

    /// HMAC key for signed photo links
    pub signing_key: SecretString,

    #[serde(default = "default_url_ttl")]
    pub url_ttl_secs: i64,
}

impl StorageConfig {
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.signing_key.expose_secret().len() < 16 {
            return Err(ValidationError::MissingRequired(
                "FAMILY_RECIPES__STORAGE__SIGNING_KEY (16+ bytes)",
            ));
        }
        if !(60..=86_400).contains(&self.url_ttl_secs) {
            return Err(ValidationError::InvalidUrlTtl);
        }
        check_base_url("storage.public_base_url", &self.public_base_url, environment)
    }
}

fn default_photo_root() -> PathBuf {
    PathBuf::from("./data")
}

fn default_url_ttl() -> i64 {
    3600
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> StorageConfig {
        StorageConfig {
            photo_root: default_photo_root(),
            public_base_url: "https://recipes.example.com".to_string(),
            signing_key: SecretString::new("0123456789abcdef0123".to_string()),
            url_ttl_secs: default_url_ttl(),
        }
    }

    #[test]
    fn defaults_to_one_hour_links() {
        assert_eq!(config().url_ttl_secs, 3600);
        assert!(config().validate(&Environment::Production).is_ok());
    }

    #[test]
    fn short_signing_key_is_rejected() {
        let config = StorageConfig {
            signing_key: SecretString::new("short".to_string()),
            ..config()
        };
        assert!(config.validate(&Environment::Development).is_err());
    }

    #[test]
    fn ttl_outside_bounds_is_rejected() {
        for ttl in [0, 59, 86_401] {
            let config = StorageConfig {
                url_ttl_secs: ttl,
                ..config()
            };
            assert!(matches!(
                config.validate(&Environment::Development),
                Err(ValidationError::InvalidUrlTtl)
            ));
        }
    }
}
