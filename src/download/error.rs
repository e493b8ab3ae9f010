//! Error types for the download module.
//!
//! Every per-item failure in a harvest run is one of these variants. The
//! [`FailureKind`] classification groups them for run summaries.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while fetching the source page or a PDF.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Network-level error (DNS resolution, connection refused, TLS, body read).
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before the body was fully received.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// Response status was not the one the caller requires.
    #[error("HTTP {status} downloading {url}")]
    HttpStatus {
        /// The URL that returned the status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// Response declared a content type other than `application/pdf`.
    #[error("invalid content type for {url}: {content_type:?} (expected application/pdf)")]
    UnexpectedContentType {
        /// The URL that returned the response.
        url: String,
        /// The declared `Content-Type`, empty when the header was absent.
        content_type: String,
    },

    /// Response body contained zero bytes.
    #[error("downloaded 0 bytes for {url}; not creating file")]
    EmptyBody {
        /// The URL that returned an empty body.
        url: String,
    },

    /// File system error (create file, write, etc.)
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The URL is malformed or cannot be mapped to a local filename.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },
}

/// Coarse classification of a [`DownloadError`] for summaries and exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Malformed source or link URL.
    Validation,
    /// Connection failure, timeout, or body-read failure.
    Transport,
    /// Wrong status, wrong content type, or empty body.
    Protocol,
    /// Directory or file creation/write failure.
    Filesystem,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Validation => "validation",
            Self::Transport => "transport",
            Self::Protocol => "protocol",
            Self::Filesystem => "filesystem",
        };
        f.write_str(label)
    }
}

impl DownloadError {
    /// Creates a network error, promoting reqwest timeouts to [`DownloadError::Timeout`].
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            return Self::Timeout { url: url.into() };
        }
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates a content-type mismatch error.
    pub fn unexpected_content_type(url: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self::UnexpectedContentType {
            url: url.into(),
            content_type: content_type.into(),
        }
    }

    /// Creates an empty-body error.
    pub fn empty_body(url: impl Into<String>) -> Self {
        Self::EmptyBody { url: url.into() }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Returns the failure classification for this error.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidUrl { .. } => FailureKind::Validation,
            Self::Network { .. } | Self::Timeout { .. } => FailureKind::Transport,
            Self::HttpStatus { .. } | Self::UnexpectedContentType { .. } | Self::EmptyBody { .. } => {
                FailureKind::Protocol
            }
            Self::Io { .. } => FailureKind::Filesystem,
        }
    }
}

// No From<reqwest::Error> / From<std::io::Error>: every variant needs the url or
// path, which the source errors do not carry.

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_download_error_timeout_display() {
        let error = DownloadError::timeout("https://example.com/file.pdf");
        assert!(error.to_string().contains("timeout"));
        assert!(error.to_string().contains("https://example.com/file.pdf"));
        assert_eq!(error.kind(), FailureKind::Transport);
    }

    #[test]
    fn test_download_error_http_status_display() {
        let error = DownloadError::http_status("https://example.com/file.pdf", 404);
        let msg = error.to_string();
        assert!(msg.contains("404"), "Expected '404' in: {msg}");
        assert!(
            msg.contains("https://example.com/file.pdf"),
            "Expected URL in: {msg}"
        );
        assert_eq!(error.kind(), FailureKind::Protocol);
    }

    #[test]
    fn test_download_error_content_type_display() {
        let error =
            DownloadError::unexpected_content_type("https://example.com/a.pdf", "text/html");
        let msg = error.to_string();
        assert!(msg.contains("text/html"), "Expected content type in: {msg}");
        assert!(msg.contains("application/pdf"), "Expected hint in: {msg}");
        assert_eq!(error.kind(), FailureKind::Protocol);
    }

    #[test]
    fn test_download_error_empty_body_is_protocol_failure() {
        let error = DownloadError::empty_body("https://example.com/a.pdf");
        assert!(error.to_string().contains("0 bytes"));
        assert_eq!(error.kind(), FailureKind::Protocol);
    }

    #[test]
    fn test_download_error_io_display() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let error = DownloadError::io(PathBuf::from("/tmp/test.pdf"), io_error);
        let msg = error.to_string();
        assert!(msg.contains("/tmp/test.pdf"), "Expected path in: {msg}");
        assert_eq!(error.kind(), FailureKind::Filesystem);
    }

    #[test]
    fn test_download_error_invalid_url_display() {
        let error = DownloadError::invalid_url("not-a-url");
        let msg = error.to_string();
        assert!(msg.contains("invalid URL"), "Expected 'invalid URL' in: {msg}");
        assert!(msg.contains("not-a-url"), "Expected URL in: {msg}");
        assert_eq!(error.kind(), FailureKind::Validation);
    }

    #[test]
    fn test_failure_kind_serializes_snake_case() {
        let json = serde_json::to_string(&FailureKind::Filesystem).unwrap();
        assert_eq!(json, "\"filesystem\"");
        assert_eq!(FailureKind::Transport.to_string(), "transport");
    }
}
