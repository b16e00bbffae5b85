//! `<link rel*="icon">` extraction.

use scraper::{Html, Selector};

const LINK_WITH_REL: &str = "link[rel]";

/// Returns the `href` of the first `<link>` whose `rel` contains the substring
/// `icon`, if it has one.
///
/// The `rel` substring test is case-sensitive.
/// Only the first matching element is considered: a first match without an
/// `href` yields `None` even when a later link carries one.
pub fn find_icon_href(html: &str) -> Option<String> {
    let selector = match Selector::parse(LINK_WITH_REL) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!("icon link selector failed to parse: {e}");
            return None;
        }
    };
    let document = Html::parse_document(html);
    let element = document
        .select(&selector)
        .find(|el| el.value().attr("rel").is_some_and(|rel| rel.contains("icon")))?;
    element.value().attr("href").map(str::to_string)
}
