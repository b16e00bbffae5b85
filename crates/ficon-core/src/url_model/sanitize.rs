//! Header-safe filename sanitization.

/// Sanitizes a candidate filename for use as an unquoted `filename=` token.
///
/// - Percent-escapes are left as they arrive from the URL path
/// - Replaces control characters, whitespace, `"`, `;`, `,`, `\` and `/` with `_`
/// - Collapses consecutive underscores
/// - Trims leading/trailing dots and underscores
/// - Limits length to 255 bytes
pub fn sanitize_header_filename(name: &str) -> String {
    const NAME_MAX: usize = 255;

    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;

    for c in name.chars() {
        let unsafe_char = c.is_control()
            || c.is_whitespace()
            || matches!(c, '"' | ';' | ',' | '\\' | '/')
            || !c.is_ascii();
        let replacement = if unsafe_char { '_' } else { c };

        if replacement == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(replacement);
            prev_underscore = false;
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');

    if trimmed.len() > NAME_MAX {
        trimmed[..NAME_MAX].to_string()
    } else {
        trimmed.to_string()
    }
}
