//! Cache configuration

use chrono::Duration;
use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Storage backend for aggregated results
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    #[default]
    Memory,
    File,
    Redis,
}

/// Aggregate cache configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub backend: CacheBackend,

    /// Age in minutes after which an entry is ignored
    #[serde(default = "default_ttl_minutes")]
    pub ttl_minutes: i64,

    /// Directory for the file backend
    #[serde(default = "default_file_dir")]
    pub file_dir: PathBuf,

    /// Connection URL for the redis backend
    pub redis_url: Option<String>,

    /// Capacity bound for the memory backend; unbounded when unset
    pub max_entries: Option<usize>,

    /// Expiry Redis applies to stored entries; kept forever when unset
    pub redis_retention_secs: Option<u64>,
}

impl CacheConfig {
    /// Get TTL as Duration
    pub fn ttl(&self) -> Duration {
        Duration::minutes(self.ttl_minutes)
    }

    /// Validate cache configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.ttl_minutes <= 0 {
            return Err(ValidationError::InvalidCacheTtl);
        }
        if self.max_entries == Some(0) {
            return Err(ValidationError::InvalidCacheCapacity);
        }
        match self.backend {
            CacheBackend::Memory => {}
            CacheBackend::File => {
                if self.file_dir.as_os_str().is_empty() {
                    return Err(ValidationError::MissingRequired("CACHE__FILE_DIR"));
                }
            }
            CacheBackend::Redis => {
                let url = self
                    .redis_url
                    .as_deref()
                    .filter(|url| !url.is_empty())
                    .ok_or(ValidationError::MissingRequired("CACHE__REDIS_URL"))?;
                if !url.starts_with("redis://") && !url.starts_with("rediss://") {
                    return Err(ValidationError::InvalidRedisUrl);
                }
            }
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            ttl_minutes: default_ttl_minutes(),
            file_dir: default_file_dir(),
            redis_url: None,
            max_entries: None,
            redis_retention_secs: None,
        }
    }
}

fn default_ttl_minutes() -> i64 {
    30
}

fn default_file_dir() -> PathBuf {
    PathBuf::from(".cache/survey-insights")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_config_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.backend, CacheBackend::Memory);
        assert_eq!(config.ttl(), Duration::minutes(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let config = CacheConfig {
            ttl_minutes: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidCacheTtl));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = CacheConfig {
            max_entries: Some(0),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidCacheCapacity));
    }

    #[test]
    fn test_redis_backend_requires_url() {
        let config = CacheConfig {
            backend: CacheBackend::Redis,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("CACHE__REDIS_URL"))
        );

        let config = CacheConfig {
            backend: CacheBackend::Redis,
            redis_url: Some("http://localhost".to_string()),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidRedisUrl));

        let config = CacheConfig {
            backend: CacheBackend::Redis,
            redis_url: Some("redis://localhost:6379".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
