//! Survey API configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::logging::Environment;

/// SurveyMonkey API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SurveyApiConfig {
    /// Base URL including the API version segment
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// OAuth access token sent as a bearer credential
    pub access_token: Secret<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Responses requested from the bulk endpoint
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl SurveyApiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate survey API configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.access_token.expose_secret().trim().is_empty() {
            return Err(ValidationError::MissingRequired("SURVEY_API__ACCESS_TOKEN"));
        }
        let is_https = self.base_url.starts_with("https://");
        if !is_https && !self.base_url.starts_with("http://") {
            return Err(ValidationError::InvalidBaseUrl);
        }
        if *environment == Environment::Production && !is_https {
            return Err(ValidationError::BaseUrlMustBeHttps);
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.per_page == 0 || self.per_page > 1000 {
            return Err(ValidationError::InvalidPerPage);
        }
        Ok(())
    }
}

fn default_base_url() -> String {
    "https://api.surveymonkey.com/v3".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_per_page() -> u32 {
    1000
}
