//! LINE channel configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// Messaging API credentials and endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct LineConfig {
    /// Verifies `x-line-signature` on webhook deliveries
    pub channel_secret: SecretString,

    /// Bearer token for reply, push and content calls
    pub channel_access_token: SecretString,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Host serving message content (photo bytes)
    #[serde(default = "default_data_api_base_url")]
    pub data_api_base_url: String,

    /// Mini-app entry point; the seasoning picker link is `{base}/seasoning?session={id}`
    pub liff_base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl LineConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.channel_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired(
                "FAMILY_RECIPES__LINE__CHANNEL_SECRET",
            ));
        }
        if self.channel_access_token.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired(
                "FAMILY_RECIPES__LINE__CHANNEL_ACCESS_TOKEN",
            ));
        }
        if self.timeout_secs == 0 || self.timeout_secs > 60 {
            return Err(ValidationError::InvalidTimeout);
        }
        check_base_url("line.api_base_url", &self.api_base_url, environment)?;
        check_base_url("line.data_api_base_url", &self.data_api_base_url, environment)?;
        check_base_url("line.liff_base_url", &self.liff_base_url, environment)?;
        Ok(())
    }
}

pub(super) fn check_base_url(
    name: &'static str,
    url: &str,
    environment: &Environment,
) -> Result<(), ValidationError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ValidationError::InvalidBaseUrl(name));
    }
    if *environment == Environment::Production && !url.starts_with("https://") {
        return Err(ValidationError::BaseUrlMustBeHttps(name));
    }
    Ok(())
}

fn default_api_base_url() -> String {
    "https://api.line.me".to_string()
}

fn default_data_api_base_url() -> String {
    "https://api-data.line.me".to_string()
}

fn default_timeout() -> u64 {
    10
}
