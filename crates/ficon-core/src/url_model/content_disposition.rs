//! Content-Disposition header construction for served icons.

use super::path::filename_from_url_path;
use super::sanitize::sanitize_header_filename;

/// Filename used when the source URL has no usable last path segment.
pub const DEFAULT_ICON_FILENAME: &str = "favicon";

/// Derives the filename advertised for an icon from the URL it was fetched from.
///
/// Takes the last path segment of `source_url`, sanitized for a header token.
/// Empty or unusable segments fall back to [`DEFAULT_ICON_FILENAME`].
pub fn icon_filename(source_url: &str) -> String {
    filename_from_url_path(source_url)
        .map(|s| sanitize_header_filename(&s))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_ICON_FILENAME.to_string())
}

/// `inline; filename=<derived>` for the given source URL.
pub fn inline_disposition(source_url: &str) -> String {
    format!("inline; filename={}", icon_filename(source_url))
}
