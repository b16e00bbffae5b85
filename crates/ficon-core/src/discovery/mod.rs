//! Favicon discovery: well-known paths first, then the page's icon link.
//!
//! Candidates are fetched one at a time and the first image wins. All fetches
//! of one resolution share a single fresh cookie jar.

mod data_url;
mod html;

pub use data_url::{decode_inline_image, InlineImage};
pub use html::find_icon_href;

use url::Url;

use crate::fetch::{CookieJar, Fetcher};
use crate::url_model::Target;

/// Conventional favicon filenames tried against the target's origin, in order.
pub const WELL_KNOWN_FILES: [&str; 3] = ["favicon.ico", "favicon.png", "apple-touch-icon.png"];

/// An image fetched from a candidate URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundIcon {
    pub bytes: Vec<u8>,
    pub content_type: String,
    /// URL the image was served from, after redirects.
    pub source_url: Url,
}

/// Result of one resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Found(FoundIcon),
    /// The target page itself answered with a non-2xx status.
    PageFetchFailed { status: u32, reason: String },
    /// No candidate produced an image; every attempted URL, in order.
    NotFound { tried: Vec<String> },
}

#[derive(Debug, Clone)]
pub struct Discovery {
    fetcher: Fetcher,
}

impl Discovery {
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }

    pub async fn resolve(&self, target: &Target, from_html_only: bool) -> Outcome {
        let mut jar = CookieJar::new();
        let mut tried: Vec<String> = Vec::new();

        if !from_html_only {
            for file_name in WELL_KNOWN_FILES {
                let candidate = match target.well_known(file_name) {
                    Ok(u) => u,
                    Err(e) => {
                        tracing::warn!(url = %target, file_name, "bad well-known URL: {e}");
                        continue;
                    }
                };
                tried.push(candidate.to_string());
                if let Some(found) = self.try_image(&candidate, &mut jar).await {
                    return Outcome::Found(found);
                }
            }
        }

        let page_url = target.url();
        tried.push(page_url.to_string());
        let page = match self.fetcher.fetch(page_url, &mut jar).await {
            Ok(page) => page,
            Err(e) => {
                tracing::debug!(url = %page_url, "page fetch failed: {e}");
                return Outcome::NotFound { tried };
            }
        };
        if !page.is_success() {
            tracing::debug!(url = %page_url, status = page.status, "page returned non-success");
            return Outcome::PageFetchFailed {
                status: page.status,
                reason: page.reason,
            };
        }

        let text = String::from_utf8_lossy(&page.body);
        let Some(href) = find_icon_href(&text) else {
            tracing::debug!(url = %page_url, "no icon link in page");
            return Outcome::NotFound { tried };
        };
        let href = href.trim();
        let Ok(icon_url) = page_url.join(href) else {
            tracing::debug!(url = %page_url, href, "icon href is not a valid URL");
            tried.push(href.to_string());
            return Outcome::NotFound { tried };
        };
        tried.push(icon_url.to_string());

        if icon_url.scheme() == "data" {
            return match decode_inline_image(icon_url.as_str()) {
                Some(inline) => Outcome::Found(FoundIcon {
                    bytes: inline.bytes,
                    content_type: inline.content_type,
                    source_url: icon_url,
                }),
                None => {
                    tracing::debug!(url = %page_url, "inline icon link is not a decodable image");
                    Outcome::NotFound { tried }
                }
            };
        }
        if !matches!(icon_url.scheme(), "http" | "https") {
            tracing::debug!(url = %page_url, href, "icon href has an unsupported scheme");
            return Outcome::NotFound { tried };
        }

        if let Some(found) = self.try_image(&icon_url, &mut jar).await {
            return Outcome::Found(found);
        }

        Outcome::NotFound { tried }
    }

    /// Fetch `url`; an image only when the response is 2xx with an `image/*` content type.
    async fn try_image(&self, url: &Url, jar: &mut CookieJar) -> Option<FoundIcon> {
        let res = match self.fetcher.fetch(url, jar).await {
            Ok(res) => res,
            Err(e) => {
                tracing::debug!(url = %url, "candidate failed: {e}");
                return None;
            }
        };
        if !res.is_success() || !res.is_image() {
            tracing::debug!(
                url = %url,
                status = res.status,
                content_type = res.content_type.as_deref().unwrap_or("-"),
                "candidate is not an image"
            );
            return None;
        }
        let content_type = res.content_type.unwrap_or_default();
        tracing::debug!(url = %res.url, %content_type, bytes = res.body.len(), "candidate accepted");
        Some(FoundIcon {
            bytes: res.body,
            content_type,
            source_url: res.url,
        })
    }
}
