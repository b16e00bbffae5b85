//! Cache entry and its blob metadata encoding.

use std::collections::BTreeMap;

use super::BlobObject;

pub const META_ORIGINAL_URL: &str = "originalUrl";
pub const META_EXPIRE_TIMESTAMP: &str = "expireTimestamp";

/// Cached favicon for one host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    /// Exact candidate URL that produced the image (empty when unknown).
    pub original_url: String,
    /// Expiry as Unix milliseconds; 0 when missing or unparsable.
    pub expire_timestamp: i64,
}

impl CacheEntry {
    pub fn is_fresh_at(&self, now_millis: i64) -> bool {
        self.expire_timestamp > now_millis
    }

    pub(crate) fn from_blob(object: BlobObject) -> Self {
        let original_url = object
            .metadata
            .get(META_ORIGINAL_URL)
            .cloned()
            .unwrap_or_default();
        let expire_timestamp = object
            .metadata
            .get(META_EXPIRE_TIMESTAMP)
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(0);
        Self {
            bytes: object.body,
            content_type: object.content_type.filter(|ct| !ct.is_empty()),
            original_url,
            expire_timestamp,
        }
    }

    pub(crate) fn to_blob(&self) -> BlobObject {
        let mut metadata = BTreeMap::new();
        metadata.insert(META_ORIGINAL_URL.to_string(), self.original_url.clone());
        metadata.insert(
            META_EXPIRE_TIMESTAMP.to_string(),
            self.expire_timestamp.to_string(),
        );
        BlobObject {
            body: self.bytes.clone(),
            content_type: self.content_type.clone(),
            metadata,
        }
    }
}

/// Value of the `X-Cache-Status` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
    Stale,
}

impl CacheStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
            CacheStatus::Stale => "STALE",
        }
    }
}
