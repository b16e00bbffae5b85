//! Host-keyed favicon cache over a blob store.
//!
//! The blob store is a minimal get/put key-value service with per-object
//! content type and string metadata. `FaviconCache` layers the entry contract
//! on top: `originalUrl` and `expireTimestamp` (epoch milliseconds) metadata,
//! one entry per host, overwrite on store.

mod entry;
mod memory;
mod response;
mod sqlite;

pub use entry::{CacheEntry, CacheStatus, META_EXPIRE_TIMESTAMP, META_ORIGINAL_URL};
pub use memory::MemoryBlobStore;
pub use response::{ClientResponse, DEFAULT_CONTENT_TYPE};
pub use sqlite::{default_db_path, SqliteBlobStore};

use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Stored object: body bytes plus HTTP and custom metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlobObject {
    pub body: Vec<u8>,
    pub content_type: Option<String>,
    pub metadata: BTreeMap<String, String>,
}

/// Key-value blob storage. `put` replaces any object under the same key atomically.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<BlobObject>>;
    async fn put(&self, key: &str, object: BlobObject) -> Result<()>;
}

/// Current time as Unix milliseconds.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

/// Cache store adapter: entry codec plus TTL.
#[derive(Clone)]
pub struct FaviconCache {
    blobs: Arc<dyn BlobStore>,
    ttl: Duration,
}

impl FaviconCache {
    pub fn new(blobs: Arc<dyn BlobStore>, ttl: Duration) -> Self {
        Self { blobs, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn lookup(&self, host: &str) -> Result<Option<CacheEntry>> {
        let object = self.blobs.get(host).await?;
        Ok(object.map(CacheEntry::from_blob))
    }

    /// Persist a resolved icon for `host`, expiring one TTL from now.
    pub async fn store(
        &self,
        host: &str,
        bytes: Vec<u8>,
        content_type: &str,
        source_url: &str,
    ) -> Result<CacheEntry> {
        let ttl_millis = i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX);
        let expire_timestamp = now_millis().saturating_add(ttl_millis);
        let entry = CacheEntry {
            bytes,
            content_type: Some(content_type.to_string()),
            original_url: source_url.to_string(),
            expire_timestamp,
        };
        self.blobs.put(host, entry.to_blob()).await?;
        tracing::info!(
            host,
            source = source_url,
            content_type,
            bytes = entry.bytes.len(),
            expire_timestamp,
            "stored favicon"
        );
        Ok(entry)
    }

    /// Client-facing response for an entry, advertising this cache's TTL.
    pub fn build_response(&self, entry: &CacheEntry, status: CacheStatus) -> ClientResponse {
        ClientResponse::for_entry(entry, status, self.ttl)
    }
}
