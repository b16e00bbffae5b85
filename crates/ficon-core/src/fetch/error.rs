//! Fetch error type. Every variant marks a failed candidate, never a failed resolution.

/// Error returned by a single logical fetch (all redirect hops included).
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Connect or total transfer timeout elapsed.
    #[error("request to {url} timed out")]
    Timeout { url: String },
    /// libcurl reported any other failure (DNS, connect refused, TLS, ...).
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: curl::Error,
    },
    /// The redirect chain exceeded the configured hop limit.
    #[error("too many redirects (limit {limit}) starting at {url}")]
    TooManyRedirects { url: String, limit: u32 },
    /// A `Location` header could not be resolved to an http(s) URL.
    #[error("redirect from {from} has unusable Location `{location}`")]
    InvalidRedirect { from: String, location: String },
    /// The response body grew past the configured cap.
    #[error("response body from {url} exceeds {limit} bytes")]
    BodyTooLarge { url: String, limit: usize },
    /// The blocking transfer task panicked or was cancelled.
    #[error("fetch task failed: {0}")]
    Blocking(#[from] tokio::task::JoinError),
}

impl FetchError {
    /// Map a curl error, separating timeouts from other transport failures.
    pub(crate) fn from_curl(url: &str, source: curl::Error) -> Self {
        if source.is_operation_timedout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Transport {
                url: url.to_string(),
                source,
            }
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curl_timeout_maps_to_timeout() {
        // CURLE_OPERATION_TIMEDOUT = 28
        let e = FetchError::from_curl("http://slow.example/", curl::Error::new(28));
        assert!(e.is_timeout());
        assert!(e.to_string().contains("slow.example"));
    }

    #[test]
    fn curl_connect_failure_maps_to_transport() {
        // CURLE_COULDNT_CONNECT = 7
        let e = FetchError::from_curl("http://down.example/", curl::Error::new(7));
        assert!(matches!(e, FetchError::Transport { .. }));
        assert!(!e.is_timeout());
    }
}
