//! Inline `data:` icon links.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use percent_encoding::percent_decode_str;

/// Payload of a `data:` URL whose media type is `image/*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    /// Media type without parameters, lowercased.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Decodes `data:image/...[;base64],<payload>`.
///
/// Returns `None` for other schemes, non-image media types, malformed base64
/// and empty payloads. Non-base64 payloads are percent-decoded.
pub fn decode_inline_image(reference: &str) -> Option<InlineImage> {
    let reference = reference.trim();
    let scheme = reference.get(..5)?;
    if !scheme.eq_ignore_ascii_case("data:") {
        return None;
    }
    let (meta, payload) = reference[5..].split_once(',')?;
    let mut params = meta.split(';');
    let content_type = params.next().unwrap_or_default().trim().to_ascii_lowercase();
    if !content_type.starts_with("image/") {
        return None;
    }

    let bytes = if params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
        let encoded: String = percent_decode_str(payload)
            .decode_utf8()
            .ok()?
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        STANDARD.decode(encoded).ok()?
    } else {
        percent_decode_str(payload).collect()
    };
    if bytes.is_empty() {
        return None;
    }
    Some(InlineImage {
        content_type,
        bytes,
    })
}
