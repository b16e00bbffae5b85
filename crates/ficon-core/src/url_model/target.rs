//! Validated target URL supplied by the caller.

use std::fmt;
use url::Url;

/// Reasons a caller-supplied URL is rejected before any I/O happens.
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    #[error("Missing URL")]
    Missing,
    #[error("Invalid URL: {0}")]
    Malformed(#[from] url::ParseError),
    #[error("Invalid URL: unsupported scheme `{0}`")]
    UnsupportedScheme(String),
    #[error("Invalid URL: no host")]
    MissingHost,
}

/// An absolute `http`/`https` URL with a host. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    url: Url,
}

impl Target {
    /// Parse and validate a raw URL string.
    pub fn parse(raw: &str) -> Result<Self, TargetError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(TargetError::Missing);
        }
        Self::from_url(Url::parse(raw)?)
    }

    pub fn from_url(url: Url) -> Result<Self, TargetError> {
        if !is_http_scheme(url.scheme()) {
            return Err(TargetError::UnsupportedScheme(url.scheme().to_string()));
        }
        match url.host_str() {
            Some(h) if !h.is_empty() => {}
            _ => return Err(TargetError::MissingHost),
        }
        Ok(Self { url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Cache key: host plus a non-default port (`example.com`, `127.0.0.1:8080`).
    pub fn host(&self) -> String {
        let host = self.url.host_str().unwrap_or_default();
        match self.url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        }
    }

    /// `{scheme}://{host}/`
    pub fn origin(&self) -> String {
        format!("{}://{}/", self.scheme(), self.host())
    }

    /// A well-known filename appended to the origin.
    pub fn well_known(&self, file_name: &str) -> Result<Url, url::ParseError> {
        Url::parse(&format!("{}{}", self.origin(), file_name))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

pub(crate) fn is_http_scheme(scheme: &str) -> bool {
    scheme == "http" || scheme == "https"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_https_target() {
        let t = Target::parse("https://example.com/blog/post?id=1").unwrap();
        assert_eq!(t.scheme(), "https");
        assert_eq!(t.host(), "example.com");
        assert_eq!(t.path(), "/blog/post");
        assert_eq!(t.origin(), "https://example.com/");
    }

    #[test]
    fn host_keeps_non_default_port() {
        let t = Target::parse("http://127.0.0.1:8080/x").unwrap();
        assert_eq!(t.host(), "127.0.0.1:8080");
        let t = Target::parse("https://example.com:443/").unwrap();
        assert_eq!(t.host(), "example.com");
    }

    #[test]
    fn well_known_candidates_hang_off_origin() {
        let t = Target::parse("https://example.com/deep/page.html").unwrap();
        assert_eq!(
            t.well_known("favicon.ico").unwrap().as_str(),
            "https://example.com/favicon.ico"
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(Target::parse(""), Err(TargetError::Missing)));
        assert!(matches!(
            Target::parse("not a url"),
            Err(TargetError::Malformed(_))
        ));
        assert!(matches!(
            Target::parse("ftp://example.com/file"),
            Err(TargetError::UnsupportedScheme(s)) if s == "ftp"
        ));
        assert!(matches!(
            Target::parse("mailto:someone@example.com"),
            Err(TargetError::UnsupportedScheme(_))
        ));
    }
}
