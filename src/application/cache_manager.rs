//! CacheManager - Time-to-live policy over the aggregate cache port.
//!
//! Entries older than the TTL are ignored on read but left in the store;
//! they disappear only through an explicit purge or the backend's own policy.

use chrono::Duration;
use std::sync::Arc;

use crate::domain::aggregation::{CacheEntry, CacheKey};
use crate::domain::foundation::Timestamp;
use crate::ports::{AggregateCache, CacheError, Clock};

/// Default staleness bound for cached aggregates.
pub const DEFAULT_TTL_MINUTES: i64 = 30;

pub struct CacheManager {
    cache: Arc<dyn AggregateCache>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl CacheManager {
    pub fn new(cache: Arc<dyn AggregateCache>, clock: Arc<dyn Clock>) -> Self {
        Self {
            cache,
            clock,
            ttl: Duration::minutes(DEFAULT_TTL_MINUTES),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Returns the entry only while it is younger than the TTL.
    ///
    /// Backend failures are logged and reported as a miss.
    pub async fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        let entry = match self.cache.get(key).await {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache read failed, treating as miss");
                return None;
            }
        };

        match entry {
            Some(entry) if entry.is_fresh(self.now(), self.ttl) => {
                tracing::debug!(key = %key, "Cache hit");
                Some(entry)
            }
            Some(_) => {
                tracing::debug!(key = %key, "Cache entry stale");
                None
            }
            None => {
                tracing::debug!(key = %key, "Cache miss");
                None
            }
        }
    }

    /// Stores the entry, replacing any previous one.
    pub async fn put(&self, key: &CacheKey, entry: &CacheEntry) -> Result<(), CacheError> {
        self.cache.set(key, entry).await
    }

    /// Removes every entry whose key starts with `prefix`.
    pub async fn purge(&self, prefix: &str) -> Result<usize, CacheError> {
        let removed = self.cache.remove_by_prefix(prefix).await?;
        tracing::debug!(prefix, removed, "Purged cache entries");
        Ok(removed)
    }
}
