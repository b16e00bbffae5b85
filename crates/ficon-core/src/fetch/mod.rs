//! Cookie-aware HTTP GET with manual, bounded redirect following.
//!
//! Uses the curl crate (libcurl) with automatic redirects disabled. Each hop
//! sends the jar as a `Cookie` header, merges `Set-Cookie` headers back into
//! it, and continues at the resolved `Location` while the status is 3xx.

mod cookies;
mod error;
mod parse;
mod transfer;

pub use cookies::{parse_set_cookie, CookieJar};
pub use error::FetchError;

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::config::FiconConfig;
use crate::url_model::resolve_reference;

/// Per-request limits and identity.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_redirects: u32,
    pub max_body_bytes: usize,
    pub user_agent: String,
}

impl FetchOptions {
    pub fn from_config(cfg: &FiconConfig) -> Self {
        Self {
            connect_timeout: cfg.connect_timeout(),
            request_timeout: cfg.request_timeout(),
            max_redirects: cfg.max_redirects,
            max_body_bytes: cfg.max_body_bytes,
            user_agent: cfg.user_agent.clone(),
        }
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::from_config(&FiconConfig::default())
    }
}

/// Terminal response of a fetch, after any redirects.
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    /// URL the terminal response came from (post-redirect).
    pub url: Url,
    pub status: u32,
    /// Reason phrase from the status line, or the canonical one when absent.
    pub reason: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
    /// Number of redirect hops followed.
    pub redirects: u32,
}

impl FetchedResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_image(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.trim_start().to_ascii_lowercase().starts_with("image/"))
            .unwrap_or(false)
    }
}

/// Status in the 300–399 range.
pub fn is_redirect_status(status: u32) -> bool {
    (300..400).contains(&status)
}

fn canonical_reason(status: u32) -> &'static str {
    u16::try_from(status)
        .ok()
        .and_then(|s| http::StatusCode::from_u16(s).ok())
        .and_then(|s| s.canonical_reason())
        .unwrap_or("")
}

/// Stateless fetcher; cookie state lives in the caller's jar.
#[derive(Debug, Clone)]
pub struct Fetcher {
    opts: Arc<FetchOptions>,
}

impl Fetcher {
    pub fn new(opts: FetchOptions) -> Self {
        Self {
            opts: Arc::new(opts),
        }
    }

    pub fn options(&self) -> &FetchOptions {
        &self.opts
    }

    /// GET `url`, following up to `max_redirects` hops and updating `jar` along the way.
    pub async fn fetch(
        &self,
        url: &Url,
        jar: &mut CookieJar,
    ) -> Result<FetchedResponse, FetchError> {
        let mut current = url.clone();
        let mut hops = 0u32;

        loop {
            let raw = self.fetch_once(&current, jar.header_value()).await?;

            for value in &raw.head.set_cookies {
                jar.absorb_set_cookie(value);
            }

            if is_redirect_status(raw.status) {
                if let Some(location) = raw.head.location.as_deref() {
                    if hops >= self.opts.max_redirects {
                        return Err(FetchError::TooManyRedirects {
                            url: url.to_string(),
                            limit: self.opts.max_redirects,
                        });
                    }
                    let next = resolve_reference(&current, location).ok_or_else(|| {
                        FetchError::InvalidRedirect {
                            from: current.to_string(),
                            location: location.to_string(),
                        }
                    })?;
                    tracing::debug!(
                        from = %current,
                        to = %next,
                        status = raw.status,
                        cookies = jar.len(),
                        "following redirect"
                    );
                    current = next;
                    hops += 1;
                    continue;
                }
            }

            let reason = if raw.head.reason.is_empty() {
                canonical_reason(raw.status).to_string()
            } else {
                raw.head.reason
            };

            return Ok(FetchedResponse {
                url: current,
                status: raw.status,
                reason,
                content_type: raw.head.content_type,
                body: raw.body,
                redirects: hops,
            });
        }
    }

    async fn fetch_once(
        &self,
        url: &Url,
        cookie_header: Option<String>,
    ) -> Result<transfer::RawResponse, FetchError> {
        let opts = Arc::clone(&self.opts);
        let url = url.to_string();
        tokio::task::spawn_blocking(move || {
            transfer::perform_get(&url, cookie_header.as_deref(), &opts)
        })
        .await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u32, content_type: Option<&str>) -> FetchedResponse {
        FetchedResponse {
            url: Url::parse("https://example.com/favicon.ico").unwrap(),
            status,
            reason: String::new(),
            content_type: content_type.map(str::to_string),
            body: Vec::new(),
            redirects: 0,
        }
    }

    #[test]
    fn redirect_range_is_3xx_only() {
        assert!(is_redirect_status(301));
        assert!(is_redirect_status(302));
        assert!(is_redirect_status(308));
        assert!(!is_redirect_status(200));
        assert!(!is_redirect_status(404));
        assert!(!is_redirect_status(400));
        assert!(!is_redirect_status(299));
    }

    #[test]
    fn image_detection_uses_content_type_prefix() {
        assert!(response(200, Some("image/png")).is_image());
        assert!(response(200, Some("Image/X-Icon")).is_image());
        assert!(!response(200, Some("text/html; charset=utf-8")).is_image());
        assert!(!response(200, None).is_image());
    }

    #[test]
    fn success_is_2xx() {
        assert!(response(200, None).is_success());
        assert!(response(204, None).is_success());
        assert!(!response(302, None).is_success());
        assert!(!response(500, None).is_success());
    }

    #[test]
    fn canonical_reason_fallback() {
        assert_eq!(canonical_reason(404), "Not Found");
        assert_eq!(canonical_reason(999), "");
    }
}
