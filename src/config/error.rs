//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid survey API base URL")]
    InvalidBaseUrl,

    #[error("Survey API base URL must use HTTPS in production")]
    BaseUrlMustBeHttps,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Responses per page must be between 1 and 1000")]
    InvalidPerPage,

    #[error("Cache TTL must be at least one minute")]
    InvalidCacheTtl,

    #[error("Cache capacity must be greater than zero")]
    InvalidCacheCapacity,

    #[error("Invalid Redis URL format")]
    InvalidRedisUrl,
}
