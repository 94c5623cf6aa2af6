//! Application configuration module
//!
//! Typed configuration read from environment variables with the `config` and
//! `dotenvy` crates. Keys carry the `FAMILY_RECIPES` prefix and nested values
//! are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use family_recipes::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod database;
mod error;
mod line;
mod recording;
mod redis;
mod server;
mod storage;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use line::LineConfig;
pub use recording::RecordingConfig;
pub use redis::RedisConfig;
pub use server::{Environment, ServerConfig};
pub use storage::StorageConfig;

use serde::Deserialize;

use crate::application::handlers::recording::RecordingSettings;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    pub database: DatabaseConfig,

    /// Shared lock backend; absent in single-instance deployments
    #[serde(default)]
    pub redis: Option<RedisConfig>,

    pub line: LineConfig,

    pub storage: StorageConfig,

    #[serde(default)]
    pub recording: RecordingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Reads `.env` when present, then every `FAMILY_RECIPES__*` variable:
    ///
    /// - `FAMILY_RECIPES__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `FAMILY_RECIPES__LINE__CHANNEL_SECRET=...` -> `line.channel_secret`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a required value is missing or a value
    /// cannot be parsed into its field type.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("FAMILY_RECIPES")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let environment = &self.server.environment;
        self.server.validate()?;
        self.database.validate()?;
        if let Some(redis) = &self.redis {
            redis.validate()?;
        }
        self.line.validate(environment)?;
        self.storage.validate(environment)?;
        self.recording.validate()?;
        Ok(())
    }

    pub fn recording_settings(&self) -> RecordingSettings {
        self.recording
            .to_settings(&self.line.liff_base_url, self.storage.url_ttl_secs)
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cooking::CompletionPolicy;
    use std::env;
    use std::sync::Mutex;

    // Environment variables are process-global.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const MINIMAL: &[(&str, &str)] = &[
        ("FAMILY_RECIPES__DATABASE__URL", "postgresql://test@localhost/recipes"),
        ("FAMILY_RECIPES__LINE__CHANNEL_SECRET", "channel-secret"),
        ("FAMILY_RECIPES__LINE__CHANNEL_ACCESS_TOKEN", "access-token"),
        ("FAMILY_RECIPES__LINE__LIFF_BASE_URL", "https://liff.line.me/1234-abcd"),
        ("FAMILY_RECIPES__STORAGE__PUBLIC_BASE_URL", "https://recipes.example.com"),
        ("FAMILY_RECIPES__STORAGE__SIGNING_KEY", "0123456789abcdef0123"),
    ];

    const OPTIONAL: &[&str] = &[
        "FAMILY_RECIPES__SERVER__PORT",
        "FAMILY_RECIPES__SERVER__ENVIRONMENT",
        "FAMILY_RECIPES__REDIS__URL",
        "FAMILY_RECIPES__RECORDING__COMPLETION_POLICY",
    ];

    fn set_minimal_env() {
        for (key, value) in MINIMAL {
            env::set_var(key, value);
        }
    }

    fn clear_env() {
        for (key, _) in MINIMAL {
            env::remove_var(key);
        }
        for key in OPTIONAL {
            env::remove_var(key);
        }
    }

    fn load_with(extra: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        set_minimal_env();
        for (key, value) in extra {
            env::set_var(key, value);
        }
        let result = AppConfig::load();
        clear_env();
        result
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let result = load_with(&[]);

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.database.url, "postgresql://test@localhost/recipes");
        assert_eq!(config.line.api_base_url, "https://api.line.me");
        assert!(config.redis.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[]).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.storage.url_ttl_secs, 3600);
        assert_eq!(config.recording.completion_policy, CompletionPolicy::Monotonic);
    }

    #[test]
    fn test_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[
            ("FAMILY_RECIPES__SERVER__PORT", "3000"),
            ("FAMILY_RECIPES__SERVER__ENVIRONMENT", "production"),
            ("FAMILY_RECIPES__REDIS__URL", "redis://localhost:6379"),
            ("FAMILY_RECIPES__RECORDING__COMPLETION_POLICY", "recompute"),
        ])
        .unwrap();

        assert_eq!(config.server.port, 3000);
        assert!(config.is_production());
        assert_eq!(
            config.redis.as_ref().map(|r| r.url.as_str()),
            Some("redis://localhost:6379")
        );
        assert_eq!(config.recording.completion_policy, CompletionPolicy::Recompute);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_recording_settings_take_links_from_sections() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[]).unwrap();
        let settings = config.recording_settings();

        assert_eq!(settings.liff_base_url, "https://liff.line.me/1234-abcd");
        assert_eq!(settings.photo_url_ttl_secs, 3600);
    }

    #[test]
    fn test_missing_line_section_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("FAMILY_RECIPES__DATABASE__URL", "postgresql://test@localhost/recipes");
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_err());
    }
}
