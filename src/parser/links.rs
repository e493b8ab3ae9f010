//! PDF link extraction from raw HTML text.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

/// Matches absolute http(s) URLs ending in `.pdf`, with an optional query string.
///
/// The run before `.pdf` is lazy and excludes whitespace, quotes and angle
/// brackets, so a URL ends at the first `.pdf` that closes it.
#[allow(clippy::expect_used)]
static PDF_LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https?://[^\s"'<>]+?\.pdf(?:\?[^\s"'<>]*)?"#).expect("PDF link regex is valid") // Static pattern, safe to panic
});

/// Extracts unique PDF URLs from HTML text, in first-seen order.
///
/// The text is scanned line by line, so URLs split across lines are not
/// found. Duplicates are dropped on exact string comparison.
///
/// # Examples
///
/// ```
/// use pdfharvest_core::parser::extract_pdf_links;
///
/// let html = r#"<a href="https://example.com/a.pdf">A</a> <a href='https://example.com/a.pdf'>again</a>"#;
/// assert_eq!(extract_pdf_links(html), vec!["https://example.com/a.pdf".to_string()]);
/// ```
#[tracing::instrument(skip(html), fields(html_len = html.len()))]
#[must_use]
pub fn extract_pdf_links(html: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for line in html.lines() {
        for found in PDF_LINK_PATTERN.find_iter(line) {
            let link = found.as_str();
            if seen.insert(link) {
                trace!(url = %link, "found PDF link");
                links.push(link.to_string());
            }
        }
    }

    debug!(count = links.len(), "extracted PDF links");
    links
}
