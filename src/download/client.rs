//! HTTP client wrapper for fetching the source page and PDF bodies.
//!
//! Both fetches buffer the full body in memory; nothing touches the disk here.

use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, instrument};

use super::constants::{DOWNLOAD_TIMEOUT_SECS, PAGE_TIMEOUT_SECS, PDF_CONTENT_TYPE};
use super::error::DownloadError;

/// Total request timeouts (connect, headers and body) per request kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    /// Timeout for the source page fetch.
    pub page: Duration,
    /// Timeout for each PDF fetch.
    pub download: Duration,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            page: Duration::from_secs(PAGE_TIMEOUT_SECS),
            download: Duration::from_secs(DOWNLOAD_TIMEOUT_SECS),
        }
    }
}

/// HTTP client shared by the page cache and the download engine.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    timeouts: HttpTimeouts,
}

impl HttpClient {
    /// Creates a client with the given per-request timeouts.
    ///
    /// No default headers are set; redirects follow reqwest's default policy.
    ///
    /// # Errors
    ///
    /// Returns the reqwest builder error if the TLS backend or resolver
    /// cannot be initialised.
    pub fn new(timeouts: HttpTimeouts) -> Result<Self, reqwest::Error> {
        let client = Client::builder().build()?;
        Ok(Self { client, timeouts })
    }

    /// Returns the configured timeouts.
    #[must_use]
    pub fn timeouts(&self) -> HttpTimeouts {
        self.timeouts
    }

    /// Fetches the source page body.
    ///
    /// # Errors
    ///
    /// - [`DownloadError::Network`] / [`DownloadError::Timeout`] on transport failure
    /// - [`DownloadError::HttpStatus`] for any non-success status
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_page(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        let response = self.send_get(url, self.timeouts.page).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        read_body(response, url).await
    }

    /// Fetches a PDF body, applying the status, content-type and empty-body gates.
    ///
    /// # Errors
    ///
    /// - [`DownloadError::Network`] / [`DownloadError::Timeout`] on transport or body-read failure
    /// - [`DownloadError::HttpStatus`] unless the status is exactly `200 OK`
    /// - [`DownloadError::UnexpectedContentType`] unless `Content-Type` contains `application/pdf`
    /// - [`DownloadError::EmptyBody`] when zero bytes were received
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_pdf(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        let response = self.send_get(url, self.timeouts.download).await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.contains(PDF_CONTENT_TYPE) {
            return Err(DownloadError::unexpected_content_type(url, content_type));
        }

        let body = read_body(response, url).await?;
        if body.is_empty() {
            return Err(DownloadError::empty_body(url));
        }

        Ok(body)
    }

    async fn send_get(&self, url: &str, timeout: Duration) -> Result<Response, DownloadError> {
        debug!(timeout_secs = timeout.as_secs(), "sending GET");
        self.client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_builder() {
                    DownloadError::invalid_url(url)
                } else {
                    DownloadError::network(url, e)
                }
            })
    }
}

/// Collects the response body into memory, chunk by chunk.
async fn read_body(response: Response, url: &str) -> Result<Vec<u8>, DownloadError> {
    let capacity = response
        .content_length()
        .and_then(|len| usize::try_from(len).ok())
        .unwrap_or(0);
    let mut buffer = Vec::with_capacity(capacity);
    let mut stream = response.bytes_stream();

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::network(url, e))?;
        buffer.extend_from_slice(&chunk);
    }

    debug!(bytes = buffer.len(), "body received");
    Ok(buffer)
}
