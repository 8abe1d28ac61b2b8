//! Redis-backed aggregate cache for shared deployments.
//!
//! Entries are JSON strings under a namespaced key. Writes use `SET`, with an
//! `EX` expiry when a retention period is configured; prefix purges walk the
//! keyspace with `SCAN MATCH` and delete matches in batches.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::domain::aggregation::{CacheEntry, CacheKey};
use crate::ports::{AggregateCache, CacheError};

const NAMESPACE: &str = "survey-insights:";
const SCAN_BATCH: usize = 200;

/// Redis-backed aggregate cache.
#[derive(Clone)]
pub struct RedisAggregateCache {
    conn: MultiplexedConnection,
    retention_secs: Option<u64>,
}

impl RedisAggregateCache {
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self {
            conn,
            retention_secs: None,
        }
    }

    /// Connects to `url` and returns a cache over a multiplexed connection.
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(url).map_err(backend)?;
        let conn = client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(backend)?;
        Ok(Self::new(conn))
    }

    /// Lets Redis drop entries after `secs`, independent of the read TTL.
    pub fn with_retention_secs(mut self, secs: u64) -> Self {
        self.retention_secs = Some(secs).filter(|secs| *secs > 0);
        self
    }
}

fn backend(e: redis::RedisError) -> CacheError {
    CacheError::Backend(e.to_string())
}

fn namespaced(key: &str) -> String {
    format!("{}{}", NAMESPACE, key)
}

/// Escapes glob metacharacters so `prefix` matches literally in `SCAN MATCH`.
fn match_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(NAMESPACE.len() + prefix.len() + 1);
    pattern.push_str(NAMESPACE);
    for c in prefix.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\' | '^') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('*');
    pattern
}

#[async_trait]
impl AggregateCache for RedisAggregateCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>, CacheError> {
        let mut conn = self.conn.clone();
        let json: Option<String> = conn.get(namespaced(key.as_str())).await.map_err(backend)?;

        match json {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &CacheKey, entry: &CacheEntry) -> Result<(), CacheError> {
        let json = serde_json::to_string(entry)?;
        let mut conn = self.conn.clone();

        let mut cmd = redis::cmd("SET");
        cmd.arg(namespaced(key.as_str())).arg(json);
        if let Some(secs) = self.retention_secs {
            cmd.arg("EX").arg(secs);
        }
        cmd.query_async::<_, ()>(&mut conn).await.map_err(backend)?;
        Ok(())
    }

    async fn remove_by_prefix(&self, prefix: &str) -> Result<usize, CacheError> {
        let pattern = match_pattern(prefix);
        let mut conn = self.conn.clone();
        let mut cursor: u64 = 0;
        let mut removed = 0;

        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(backend)?;

            if !keys.is_empty() {
                let deleted: usize = conn.del(&keys).await.map_err(backend)?;
                removed += deleted;
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        Ok(removed)
    }
}

impl std::fmt::Debug for RedisAggregateCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisAggregateCache")
            .field("retention_secs", &self.retention_secs)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_namespaced() {
        assert_eq!(namespaced("survey:1:0:7d"), "survey-insights:survey:1:0:7d");
    }

    #[test]
    fn match_pattern_escapes_glob_metacharacters() {
        assert_eq!(match_pattern("survey:1:"), "survey-insights:survey:1:*");
        assert_eq!(
            match_pattern("survey:a*b?[c]:"),
            "survey-insights:survey:a\\*b\\?\\[c\\]:*"
        );
    }

    // Requires a running Redis instance; run with `cargo test -- --ignored`.
    #[tokio::test]
    #[ignore]
    async fn round_trip_and_purge_against_local_redis() {
        use crate::domain::aggregation::TimeRange;
        use crate::domain::foundation::{SurveyId, Timestamp};

        let cache = RedisAggregateCache::connect("redis://127.0.0.1/")
            .await
            .unwrap()
            .with_retention_secs(60);
        let survey = SurveyId::new("redis-test").unwrap();
        let key = CacheKey::new(&survey, 0, &TimeRange::LastWeek);
        let entry = CacheEntry {
            question_data: vec![],
            title: "t".to_string(),
            raw_responses: vec![],
            cached_at: Timestamp::now(),
        };

        cache.set(&key, &entry).await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap(), Some(entry));

        let removed = cache
            .remove_by_prefix(&CacheKey::survey_prefix(&survey))
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert_eq!(cache.get(&key).await.unwrap(), None);
    }
}
