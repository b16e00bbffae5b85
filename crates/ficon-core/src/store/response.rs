//! Client-facing response built from a cache entry or a resolution failure.

use std::time::Duration;

use super::{CacheEntry, CacheStatus};
use crate::url_model::inline_disposition;

/// Served when an entry carries no content type.
pub const DEFAULT_CONTENT_TYPE: &str = "image/png";

/// Transport-neutral response; the HTTP adapter copies it onto its own types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientResponse {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: Vec<u8>,
}

impl ClientResponse {
    pub fn for_entry(entry: &CacheEntry, status: CacheStatus, ttl: Duration) -> Self {
        let content_type = entry
            .content_type
            .clone()
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
        let headers = vec![
            ("Content-Type", content_type),
            (
                "Content-Disposition",
                inline_disposition(&entry.original_url),
            ),
            (
                "Cache-Control",
                format!("public, max-age={}, immutable", ttl.as_secs()),
            ),
            ("X-Cache-Status", status.as_str().to_string()),
            ("X-Icon-URL", entry.original_url.clone()),
        ];
        Self {
            status: 200,
            headers,
            body: entry.bytes.clone(),
        }
    }

    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: vec![("Content-Type", "text/plain; charset=utf-8".to_string())],
            body: body.into().into_bytes(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
