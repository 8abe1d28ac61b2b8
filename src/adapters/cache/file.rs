//! File-based Aggregate Cache Adapter
//!
//! Stores one JSON document per key. File names are the SHA-256 of the key so
//! arbitrary survey ids never reach the filesystem; the original key is kept
//! inside the document for prefix purges.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::aggregation::{CacheEntry, CacheKey};
use crate::ports::{AggregateCache, CacheError};

const EXTENSION: &str = "json";

#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    key: String,
    entry: CacheEntry,
}

/// File-based storage for aggregated results
#[derive(Debug, Clone)]
pub struct FileAggregateCache {
    base_path: PathBuf,
}

impl FileAggregateCache {
    /// Create a cache rooted at `base_path`; the directory is created on first write
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        let name: String = digest.iter().map(|byte| format!("{:02x}", byte)).collect();
        self.base_path.join(format!("{}.{}", name, EXTENSION))
    }

    async fn read_stored(path: &Path) -> Result<Option<StoredEntry>, CacheError> {
        match fs::read_to_string(path).await {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl AggregateCache for FileAggregateCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>, CacheError> {
        let stored = Self::read_stored(&self.entry_path(key.as_str())).await?;
        // A digest collision would surface as a foreign key.
        Ok(stored
            .filter(|stored| stored.key == key.as_str())
            .map(|stored| stored.entry))
    }

    async fn set(&self, key: &CacheKey, entry: &CacheEntry) -> Result<(), CacheError> {
        fs::create_dir_all(&self.base_path).await?;

        let stored = StoredEntry {
            key: key.as_str().to_string(),
            entry: entry.clone(),
        };
        let json = serde_json::to_string(&stored)?;
        fs::write(self.entry_path(key.as_str()), json).await?;
        Ok(())
    }

    async fn remove_by_prefix(&self, prefix: &str) -> Result<usize, CacheError> {
        let mut dir = match fs::read_dir(&self.base_path).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0;
        while let Some(item) = dir.next_entry().await? {
            let path = item.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
                continue;
            }

            match Self::read_stored(&path).await {
                Ok(Some(stored)) if stored.key.starts_with(prefix) => {
                    fs::remove_file(&path).await?;
                    removed += 1;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "Skipping unreadable cache file");
                }
            }
        }

        Ok(removed)
    }
}
