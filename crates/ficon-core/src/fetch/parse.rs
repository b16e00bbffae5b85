//! Parse HTTP response header lines into a ResponseHead.

/// Headers of one response that the fetcher acts on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ResponseHead {
    /// Reason phrase from the status line (empty for HTTP/2).
    pub reason: String,
    pub content_type: Option<String>,
    pub location: Option<String>,
    /// Every `Set-Cookie` value, in arrival order.
    pub set_cookies: Vec<String>,
}

/// Parse collected header lines into a ResponseHead.
///
/// A status line starts a new header block, so interim `100 Continue` blocks
/// do not leak into the final response.
pub(crate) fn parse_headers(lines: &[String]) -> ResponseHead {
    let mut head = ResponseHead::default();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            head = ResponseHead {
                reason: status_line_reason(line),
                ..ResponseHead::default()
            };
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-type") {
                head.content_type = Some(value.to_string());
            }
            if name.eq_ignore_ascii_case("location") {
                head.location = Some(value.to_string());
            }
            if name.eq_ignore_ascii_case("set-cookie") {
                head.set_cookies.push(value.to_string());
            }
        }
    }

    head
}

/// `HTTP/1.1 404 Not Found` → `Not Found`.
fn status_line_reason(line: &str) -> String {
    let mut parts = line.splitn(3, ' ');
    let _version = parts.next();
    let _code = parts.next();
    parts.next().unwrap_or("").trim().to_string()
}
