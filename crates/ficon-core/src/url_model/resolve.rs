//! Relative-to-absolute resolution of `href` and `Location` values.

use url::Url;

use super::target::is_http_scheme;

/// Resolves `reference` against `base`, accepting absolute, protocol-relative,
/// root-relative and path-relative forms.
///
/// Returns `None` when the reference is empty, unparsable, or points at a
/// non-HTTP scheme (`data:`, `javascript:`, ...).
pub fn resolve_reference(base: &Url, reference: &str) -> Option<Url> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }
    let resolved = base.join(reference).ok()?;
    if !is_http_scheme(resolved.scheme()) {
        return None;
    }
    Some(resolved)
}
