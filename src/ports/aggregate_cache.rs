//! Aggregate Cache Port - Key-value store for aggregated survey data.
//!
//! The store holds [`CacheEntry`] values under string keys. Freshness is not
//! the store's concern; the `CacheManager` applies the time-to-live on read.

use async_trait::async_trait;

use crate::domain::aggregation::{CacheEntry, CacheKey};

/// Errors that can occur during cache operations
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Failed to serialize cache entry: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Cache backend error: {0}")]
    Backend(String),
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for CacheError {
    fn from(err: std::io::Error) -> Self {
        CacheError::Io(err.to_string())
    }
}

/// Port for storing aggregated results.
#[async_trait]
pub trait AggregateCache: Send + Sync {
    /// Returns the stored entry, regardless of age.
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>, CacheError>;

    /// Stores an entry, overwriting any previous value for the key.
    async fn set(&self, key: &CacheKey, entry: &CacheEntry) -> Result<(), CacheError>;

    /// Removes every entry whose key starts with `prefix`.
    ///
    /// Returns the number of removed entries.
    async fn remove_by_prefix(&self, prefix: &str) -> Result<usize, CacheError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_errors_map_to_serialization() {
        let err = serde_json::from_str::<CacheEntry>("{").unwrap_err();
        assert!(matches!(CacheError::from(err), CacheError::Serialization(_)));
    }

    #[test]
    fn io_errors_map_to_io() {
        let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let cache_err = CacheError::from(err);
        assert!(cache_err.to_string().contains("denied"));
    }
}
