//! Recording workflow tunables

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::error::ValidationError;
use crate::application::handlers::recording::RecordingSettings;
use crate::domain::cooking::CompletionPolicy;

#[derive(Debug, Clone, Deserialize)]
pub struct RecordingConfig {
    /// `monotonic` keeps a completed session completed; `recompute` re-evaluates
    #[serde(default)]
    pub completion_policy: CompletionPolicy,

    /// Lease length of the per-user conversation lock
    #[serde(default = "default_lock_ttl_ms")]
    pub lock_ttl_ms: u64,

    #[serde(default = "default_lock_attempts")]
    pub lock_attempts: u32,

    #[serde(default = "default_lock_retry_delay_ms")]
    pub lock_retry_delay_ms: u64,

    /// YAML catalog replacing the built-in dishes and seasonings
    pub catalog_path: Option<PathBuf>,
}

impl RecordingConfig {
    /// Settings for the workflow; link bases come from the LINE and storage sections.
    pub fn to_settings(&self, liff_base_url: &str, photo_url_ttl_secs: i64) -> RecordingSettings {
        RecordingSettings {
            completion_policy: self.completion_policy,
            liff_base_url: liff_base_url.to_string(),
            lock_ttl: Duration::from_millis(self.lock_ttl_ms),
            lock_attempts: self.lock_attempts,
            lock_retry_delay: Duration::from_millis(self.lock_retry_delay_ms),
            photo_url_ttl_secs,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(100..=60_000).contains(&self.lock_ttl_ms) {
            return Err(ValidationError::InvalidLockTtl);
        }
        if !(1..=20).contains(&self.lock_attempts) {
            return Err(ValidationError::InvalidLockAttempts);
        }
        Ok(())
    }
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            completion_policy: CompletionPolicy::default(),
            lock_ttl_ms: default_lock_ttl_ms(),
            lock_attempts: default_lock_attempts(),
            lock_retry_delay_ms: default_lock_retry_delay_ms(),
            catalog_path: None,
        }
    }
}

fn default_lock_ttl_ms() -> u64 {
    10_000
}

fn default_lock_attempts() -> u32 {
    3
}

fn default_lock_retry_delay_ms() -> u64 {
    100
}
