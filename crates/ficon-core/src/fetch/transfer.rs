//! One blocking GET through libcurl, redirects left to the caller.
//!
//! Runs in the current thread; `Fetcher` calls it from `spawn_blocking`.

use std::str;

use super::parse::{parse_headers, ResponseHead};
use super::{FetchError, FetchOptions};

/// Raw outcome of a single hop.
#[derive(Debug)]
pub(crate) struct RawResponse {
    pub status: u32,
    pub head: ResponseHead,
    pub body: Vec<u8>,
}

fn configure(
    easy: &mut curl::easy::Easy,
    url: &str,
    cookie_header: Option<&str>,
    opts: &FetchOptions,
) -> Result<(), curl::Error> {
    easy.url(url)?;
    easy.get(true)?;
    easy.follow_location(false)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.timeout(opts.request_timeout)?;
    easy.useragent(&opts.user_agent)?;
    // Empty string enables every encoding libcurl was built with.
    easy.accept_encoding("")?;

    if let Some(cookie) = cookie_header {
        let mut list = curl::easy::List::new();
        list.append(&format!("Cookie: {cookie}"))?;
        easy.http_headers(list)?;
    }
    Ok(())
}

pub(crate) fn perform_get(
    url: &str,
    cookie_header: Option<&str>,
    opts: &FetchOptions,
) -> Result<RawResponse, FetchError> {
    let mut header_lines: Vec<String> = Vec::new();
    let mut body: Vec<u8> = Vec::new();
    let mut overflowed = false;
    let limit = opts.max_body_bytes;

    let mut easy = curl::easy::Easy::new();
    configure(&mut easy, url, cookie_header, opts).map_err(|e| FetchError::from_curl(url, e))?;

    let performed = {
        let mut transfer = easy.transfer();
        transfer
            .header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    header_lines.push(s.trim_end().to_string());
                }
                true
            })
            .map_err(|e| FetchError::from_curl(url, e))?;
        transfer
            .write_function(|data| {
                if body.len() + data.len() > limit {
                    overflowed = true;
                    return Ok(0); // abort transfer
                }
                body.extend_from_slice(data);
                Ok(data.len())
            })
            .map_err(|e| FetchError::from_curl(url, e))?;
        transfer.perform()
    };

    if let Err(e) = performed {
        if overflowed {
            return Err(FetchError::BodyTooLarge {
                url: url.to_string(),
                limit,
            });
        }
        return Err(FetchError::from_curl(url, e));
    }

    let status = easy
        .response_code()
        .map_err(|e| FetchError::from_curl(url, e))?;

    Ok(RawResponse {
        status,
        head: parse_headers(&header_lines),
        body,
    })
}
