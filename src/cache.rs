//! Local cache of the source page.
//!
//! The page is fetched at most once: while the cache file exists it is the
//! authoritative copy and the remote is never contacted.

use std::path::Path;

use tracing::{info, instrument, warn};
use url::Url;

use crate::download::{DownloadError, HttpClient, is_regular_file, write_file};

/// Result of [`ensure_cached`] when no transport or filesystem error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// The cache file already existed; no request was made.
    Hit,
    /// The page was fetched and written to the cache file.
    Fetched {
        /// Number of bytes written.
        bytes: u64,
    },
    /// The remote URL is not a valid absolute http(s) URL; nothing was fetched.
    InvalidUrl,
}

/// Ensures `local_path` holds a copy of `remote_url`.
///
/// The body is written verbatim. Non-success responses are not cached.
///
/// # Errors
///
/// - [`DownloadError::Network`] / [`DownloadError::Timeout`] if the fetch fails
/// - [`DownloadError::HttpStatus`] for a non-success response
/// - [`DownloadError::Io`] if the cache file cannot be written
#[instrument(skip(client, local_path), fields(path = %local_path.display()))]
pub async fn ensure_cached(
    client: &HttpClient,
    remote_url: &str,
    local_path: &Path,
) -> Result<CacheStatus, DownloadError> {
    if is_regular_file(local_path).await {
        info!("using cached page");
        return Ok(CacheStatus::Hit);
    }

    if !is_valid_page_url(remote_url) {
        warn!(url = %remote_url, "source URL is not a valid absolute http(s) URL; skipping fetch");
        return Ok(CacheStatus::InvalidUrl);
    }

    let body = client.fetch_page(remote_url).await?;
    write_file(local_path, &body).await?;

    let bytes = body.len() as u64;
    info!(url = %remote_url, bytes, "cached source page");
    Ok(CacheStatus::Fetched { bytes })
}

/// Reads the cached page as text, replacing invalid UTF-8 sequences.
///
/// Returns `None` if the cache file is missing or unreadable.
pub async fn read_cached_page(local_path: &Path) -> Option<String> {
    match tokio::fs::read(local_path).await {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(error) => {
            warn!(path = %local_path.display(), %error, "cached page unavailable");
            None
        }
    }
}

fn is_valid_page_url(raw: &str) -> bool {
    Url::parse(raw).is_ok_and(|url| {
        matches!(url.scheme(), "http" | "https") && url.host().is_some()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::download::HttpTimeouts;

    fn test_client() -> HttpClient {
        HttpClient::new(HttpTimeouts {
            page: Duration::from_secs(5),
            download: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn test_is_valid_page_url() {
        assert!(is_valid_page_url("https://ipcol.com/safety-data-sheets"));
        assert!(is_valid_page_url("http://127.0.0.1:8080/page"));
        assert!(!is_valid_page_url("ipcol.com/safety-data-sheets"));
        assert!(!is_valid_page_url("ftp://ipcol.com/page"));
        assert!(!is_valid_page_url(""));
    }

    #[tokio::test]
    async fn test_ensure_cached_fetches_and_writes_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sheets"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>sheets</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let cache = temp_dir.path().join("page.html");
        let url = format!("{}/sheets", server.uri());

        let status = ensure_cached(&test_client(), &url, &cache).await.unwrap();
        assert_eq!(status, CacheStatus::Fetched { bytes: 19 });
        assert_eq!(std::fs::read_to_string(&cache).unwrap(), "<html>sheets</html>");

        // Second call is served from disk; the mock's expect(1) verifies on drop.
        let status = ensure_cached(&test_client(), &url, &cache).await.unwrap();
        assert_eq!(status, CacheStatus::Hit);
    }

    #[tokio::test]
    async fn test_ensure_cached_existing_file_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("remote"))
            .expect(0)
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let cache = temp_dir.path().join("page.html");
        std::fs::write(&cache, "local").unwrap();

        let status = ensure_cached(&test_client(), &server.uri(), &cache)
            .await
            .unwrap();
        assert_eq!(status, CacheStatus::Hit);
        assert_eq!(std::fs::read_to_string(&cache).unwrap(), "local");
    }

    #[tokio::test]
    async fn test_ensure_cached_invalid_url_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let cache = temp_dir.path().join("page.html");

        let status = ensure_cached(&test_client(), "not a url", &cache)
            .await
            .unwrap();
        assert_eq!(status, CacheStatus::InvalidUrl);
        assert!(!cache.exists());
    }

    #[tokio::test]
    async fn test_ensure_cached_error_status_is_not_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let cache = temp_dir.path().join("page.html");

        let result = ensure_cached(&test_client(), &server.uri(), &cache).await;
        assert!(matches!(
            result,
            Err(DownloadError::HttpStatus { status: 404, .. })
        ));
        assert!(!cache.exists());
    }

    #[tokio::test]
    async fn test_read_cached_page_missing_file_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        assert!(read_cached_page(&temp_dir.path().join("absent.html")).await.is_none());
    }

    #[tokio::test]
    async fn test_read_cached_page_tolerates_invalid_utf8() {
        let temp_dir = TempDir::new().unwrap();
        let cache = temp_dir.path().join("page.html");
        std::fs::write(&cache, b"https://x.com/a.pdf \xff\xfe").unwrap();

        let text = read_cached_page(&cache).await.unwrap();
        assert!(text.starts_with("https://x.com/a.pdf"));
    }
}
