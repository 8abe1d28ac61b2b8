//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `SURVEY_INSIGHTS` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use survey_insights::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Cache TTL: {} minutes", config.cache.ttl_minutes);
//! ```

mod cache;
mod error;
mod logging;
mod survey_api;

pub use cache::{CacheBackend, CacheConfig};
pub use error::{ConfigError, ValidationError};
pub use logging::{Environment, LoggingConfig};
pub use survey_api::SurveyApiConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Survey provider configuration (SurveyMonkey)
    pub survey_api: SurveyApiConfig,

    /// Aggregate cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `SURVEY_INSIGHTS` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `SURVEY_INSIGHTS__SURVEY_API__ACCESS_TOKEN=...` -> `survey_api.access_token`
    /// - `SURVEY_INSIGHTS__CACHE__BACKEND=redis` -> `cache.backend = redis`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SURVEY_INSIGHTS")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.survey_api.validate(&self.logging.environment)?;
        self.cache.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.logging.environment == Environment::Production
    }
}
