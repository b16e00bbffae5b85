//! Staleness and refresh control in front of the discovery pipeline.
//!
//! A cache entry is Missing, Fresh or Stale. Missing resolves synchronously;
//! Fresh is served as-is; Stale is served immediately while a detached task
//! re-resolves the host for the next request. Refresh failures are logged and
//! dropped, never retried here.

use std::fmt;
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::config::FiconConfig;
use crate::discovery::{Discovery, Outcome};
use crate::fetch::{FetchOptions, Fetcher};
use crate::store::{now_millis, BlobStore, CacheEntry, CacheStatus, ClientResponse, FaviconCache};
use crate::url_model::{Target, TargetError};

/// State of the entry for one host at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Missing,
    Fresh,
    Stale,
}

impl Freshness {
    pub fn of(entry: Option<&CacheEntry>, now_millis: i64) -> Self {
        match entry {
            None => Freshness::Missing,
            Some(e) if e.is_fresh_at(now_millis) => Freshness::Fresh,
            Some(_) => Freshness::Stale,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Freshness::Missing => "missing",
            Freshness::Fresh => "fresh",
            Freshness::Stale => "stale",
        }
    }
}

/// Terminal failures of a request.
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error(transparent)]
    InvalidInput(#[from] TargetError),
    #[error("Failed to fetch page: {status} {reason}")]
    PageFetchFailed { status: u32, reason: String },
    #[error("{}", TriedUrls(.tried))]
    NotFound { tried: Vec<String> },
    #[error("Cache store failed: {0:#}")]
    Store(anyhow::Error),
}

/// Renders the `Favicon not found!` report with one `- <url>` line per attempt.
struct TriedUrls<'a>(&'a [String]);

impl fmt::Display for TriedUrls<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Favicon not found! Tried URLs:")?;
        for url in self.0 {
            write!(f, "\n- {url}")?;
        }
        Ok(())
    }
}

impl ServeError {
    pub fn status_code(&self) -> u16 {
        match self {
            ServeError::InvalidInput(_) => 400,
            ServeError::PageFetchFailed { .. } => 500,
            ServeError::NotFound { .. } => 404,
            ServeError::Store(_) => 500,
        }
    }

    pub fn to_response(&self) -> ClientResponse {
        ClientResponse::text(self.status_code(), self.to_string())
    }
}

/// Response for one request plus the handle of any refresh it started.
#[derive(Debug)]
pub struct Served {
    pub status: CacheStatus,
    pub response: ClientResponse,
    /// Background refresh started for a stale entry. Dropping it detaches the task.
    pub refresh: Option<JoinHandle<()>>,
}

/// Cache-fronted favicon resolution. Cheap to clone; clones share the store.
#[derive(Clone)]
pub struct FaviconService {
    cache: FaviconCache,
    discovery: Arc<Discovery>,
}

impl FaviconService {
    pub fn new(cache: FaviconCache, discovery: Discovery) -> Self {
        Self {
            cache,
            discovery: Arc::new(discovery),
        }
    }

    pub fn from_config(cfg: &FiconConfig, blobs: Arc<dyn BlobStore>) -> Self {
        let fetcher = Fetcher::new(FetchOptions::from_config(cfg));
        Self::new(
            FaviconCache::new(blobs, cfg.cache_ttl()),
            Discovery::new(fetcher),
        )
    }

    pub fn cache(&self) -> &FaviconCache {
        &self.cache
    }

    /// Current entry for `host` and its freshness.
    pub async fn inspect(&self, host: &str) -> anyhow::Result<(Option<CacheEntry>, Freshness)> {
        let entry = self.cache.lookup(host).await?;
        let freshness = Freshness::of(entry.as_ref(), now_millis());
        Ok((entry, freshness))
    }

    pub async fn serve(&self, target: &Target, from_html: bool) -> Result<Served, ServeError> {
        let host = target.host();
        let entry = self.cache.lookup(&host).await.map_err(ServeError::Store)?;

        let Some(entry) = entry else {
            tracing::debug!(%host, "cache miss");
            let entry = self.resolve_and_store(target, from_html).await?;
            return Ok(self.served(&entry, CacheStatus::Miss, None));
        };

        if entry.is_fresh_at(now_millis()) {
            tracing::debug!(%host, "cache hit");
            return Ok(self.served(&entry, CacheStatus::Hit, None));
        }

        tracing::debug!(%host, expired_at = entry.expire_timestamp, "stale entry, refreshing in background");
        let refresh = self.spawn_refresh(target.clone(), from_html);
        Ok(self.served(&entry, CacheStatus::Stale, Some(refresh)))
    }

    /// Run the discovery pipeline and store a found icon under the target's host.
    pub async fn resolve_and_store(
        &self,
        target: &Target,
        from_html: bool,
    ) -> Result<CacheEntry, ServeError> {
        match self.discovery.resolve(target, from_html).await {
            Outcome::Found(icon) => self
                .cache
                .store(
                    &target.host(),
                    icon.bytes,
                    &icon.content_type,
                    icon.source_url.as_str(),
                )
                .await
                .map_err(ServeError::Store),
            Outcome::PageFetchFailed { status, reason } => {
                Err(ServeError::PageFetchFailed { status, reason })
            }
            Outcome::NotFound { tried } => Err(ServeError::NotFound { tried }),
        }
    }

    /// Parse the raw `url` parameter and serve it, mapping every failure to a response.
    /// Any refresh task is detached.
    pub async fn respond(&self, raw_url: &str, from_html: bool) -> ClientResponse {
        let target = match Target::parse(raw_url) {
            Ok(t) => t,
            Err(e) => return ServeError::from(e).to_response(),
        };
        match self.serve(&target, from_html).await {
            Ok(served) => served.response,
            Err(e) => {
                tracing::info!(url = %target, status = e.status_code(), "request failed: {e}");
                e.to_response()
            }
        }
    }

    fn served(
        &self,
        entry: &CacheEntry,
        status: CacheStatus,
        refresh: Option<JoinHandle<()>>,
    ) -> Served {
        Served {
            status,
            response: self.cache.build_response(entry, status),
            refresh,
        }
    }

    fn spawn_refresh(&self, target: Target, from_html: bool) -> JoinHandle<()> {
        let svc = self.clone();
        tokio::spawn(async move {
            match svc.resolve_and_store(&target, from_html).await {
                Ok(entry) => {
                    tracing::info!(url = %target, source = %entry.original_url, "background refresh stored");
                }
                Err(e) => {
                    tracing::warn!(url = %target, "background refresh failed: {e}");
                }
            }
        })
    }
}
