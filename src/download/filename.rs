//! Filename derivation for downloaded PDFs.
//!
//! A link maps to a flat, lowercase filename built from its host, path and
//! query so that distinct links land in distinct files inside one directory.

use tracing::warn;
use url::Url;

use super::constants::PDF_EXTENSION;

/// Characters that are invalid on common filesystems.
const INVALID_FILENAME_CHARS: [char; 9] = ['"', '\\', '/', ':', '*', '?', '<', '>', '|'];

/// Converts a URL into a filesystem-safe filename.
///
/// The name is `host[_path][_query]` where `/` in the path and `&` in the
/// query become `_`. The path is percent-decoded; the query is used as
/// written in the link. Any remaining `" \ / : * ? < > |` becomes `_`,
/// `.pdf` is appended unless the name already ends with it, and the
/// result is lowercased.
///
/// Returns `None` when the URL cannot be parsed; callers must not write a
/// file in that case.
///
/// # Examples
///
/// ```
/// use pdfharvest_core::download::url_to_filename;
///
/// assert_eq!(
///     url_to_filename("https://example.com/sds/acetone.pdf").as_deref(),
///     Some("example.com__sds_acetone.pdf")
/// );
/// ```
#[must_use]
pub fn url_to_filename(raw_url: &str) -> Option<String> {
    let parsed = match Url::parse(raw_url) {
        Ok(parsed) => parsed,
        Err(error) => {
            warn!(url = %raw_url, %error, "cannot derive filename from URL");
            return None;
        }
    };

    let mut filename = authority(&parsed);

    let path = decoded_path(&parsed);
    if !path.is_empty() {
        filename.push('_');
        filename.push_str(&path.replace('/', "_"));
    }

    if let Some(query) = raw_query(raw_url)
        && !query.is_empty()
    {
        filename.push('_');
        filename.push_str(&query.replace('&', "_"));
    }

    let mut filename: String = filename
        .chars()
        .map(|c| if INVALID_FILENAME_CHARS.contains(&c) { '_' } else { c })
        .collect();

    if !filename.ends_with(PDF_EXTENSION) {
        filename.push_str(PDF_EXTENSION);
    }

    Some(filename.to_lowercase())
}

/// Host plus explicit port, e.g. `127.0.0.1:8080`.
fn authority(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    }
}

/// Query text exactly as written in the link, without the fragment.
///
/// Taken from the input rather than from [`Url::query`], which re-encodes
/// non-ASCII characters.
fn raw_query(raw_url: &str) -> Option<&str> {
    let raw_url = raw_url.trim();
    let without_fragment = raw_url.split_once('#').map_or(raw_url, |(head, _)| head);
    without_fragment.split_once('?').map(|(_, query)| query)
}

/// Path with percent-escapes decoded; the raw path is kept if decoding yields invalid UTF-8.
fn decoded_path(url: &Url) -> String {
    let raw = url.path();
    urlencoding::decode(raw).map_or_else(|_| raw.to_string(), std::borrow::Cow::into_owned)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_url_to_filename_reference_mapping() {
        assert_eq!(
            url_to_filename("https://Example.com/docs/sheet 1.pdf?id=5").unwrap(),
            "example.com__docs_sheet 1.pdf_id=5.pdf"
        );
    }

    #[test]
    fn test_url_to_filename_plain_pdf_keeps_single_extension() {
        assert_eq!(
            url_to_filename("https://ipcol.com/wp-content/uploads/SDS-Acetone.pdf").unwrap(),
            "ipcol.com__wp-content_uploads_sds-acetone.pdf"
        );
    }

    #[test]
    fn test_url_to_filename_query_ampersands_become_underscores() {
        assert_eq!(
            url_to_filename("https://example.com/get.pdf?a=1&b=2").unwrap(),
            "example.com__get.pdf_a=1_b=2.pdf"
        );
    }

    #[test]
    fn test_url_to_filename_port_colon_is_replaced() {
        assert_eq!(
            url_to_filename("http://127.0.0.1:8080/doc.pdf").unwrap(),
            "127.0.0.1_8080__doc.pdf"
        );
    }

    #[test]
    fn test_url_to_filename_has_no_illegal_characters() {
        let name =
            url_to_filename("https://example.com/a:b/c*d/e%3Ff%7Cg%22h%3Ci%3Ej.pdf?x=%5C").unwrap();
        for c in INVALID_FILENAME_CHARS {
            assert!(!name.contains(c), "unexpected {c:?} in {name}");
        }
        assert!(name.ends_with(".pdf"));
    }

    #[test]
    fn test_url_to_filename_is_lowercase() {
        let name = url_to_filename("https://EXAMPLE.com/Docs/Sheet.pdf").unwrap();
        assert_eq!(name, name.to_lowercase());
    }

    #[test]
    fn test_url_to_filename_uppercase_extension_gains_suffix() {
        // The extension check runs before lowercasing.
        assert_eq!(
            url_to_filename("https://example.com/SHEET.PDF").unwrap(),
            "example.com__sheet.pdf.pdf"
        );
    }

    #[test]
    fn test_url_to_filename_keeps_query_as_written() {
        assert_eq!(
            url_to_filename("https://x.com/g.pdf?n=é").unwrap(),
            "x.com__g.pdf_n=é.pdf"
        );
        assert_eq!(
            url_to_filename("https://x.com/g.pdf?q=a%20b#frag").unwrap(),
            "x.com__g.pdf_q=a%20b.pdf"
        );
    }

    #[test]
    fn test_url_to_filename_default_port_is_dropped() {
        assert_eq!(
            url_to_filename("https://x.com:443/b.pdf").unwrap(),
            "x.com__b.pdf"
        );
    }

    #[test]
    fn test_url_to_filename_ignores_fragment() {
        assert_eq!(
            url_to_filename("https://example.com/a.pdf#page=2").unwrap(),
            "example.com__a.pdf"
        );
    }

    #[test]
    fn test_url_to_filename_unparsable_returns_none() {
        assert_eq!(url_to_filename("not a url"), None);
        assert_eq!(url_to_filename("http://[::1/broken.pdf"), None);
    }
}
