//! Pipeline configuration.
//!
//! Defaults describe a plain run with no flags: the IPCOL safety data
//! sheet page cached as `ipcol.html`, PDFs saved under `PDFs/`, 30 second
//! timeouts, sequential downloads.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::download::constants::{DOWNLOAD_TIMEOUT_SECS, PAGE_TIMEOUT_SECS};
use crate::download::{DEFAULT_CONCURRENCY, HttpTimeouts};

/// Default page whose PDF links are harvested.
pub const DEFAULT_SOURCE_URL: &str = "https://ipcol.com/safety-data-sheets";

/// Default location of the cached source page.
pub const DEFAULT_CACHE_PATH: &str = "ipcol.html";

/// Default output directory for PDFs.
pub const DEFAULT_OUTPUT_DIR: &str = "PDFs";

/// Upper bound for either timeout, in seconds.
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Invalid configuration values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Timeout outside `1..=3600` seconds.
    #[error("invalid {field} {secs}s: expected range 1..={MAX_TIMEOUT_SECS} seconds")]
    Timeout {
        /// Which timeout was rejected.
        field: &'static str,
        /// The rejected value in whole seconds.
        secs: u64,
    },

    /// Empty source URL.
    #[error("source URL must not be empty")]
    EmptySourceUrl,
}

/// Everything one harvest run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Page to scan for PDF links.
    pub source_url: String,
    /// Where the page is cached.
    pub cache_path: PathBuf,
    /// Where PDFs are written.
    pub output_dir: PathBuf,
    /// Total timeout for the page fetch.
    pub page_timeout: Duration,
    /// Total timeout for each PDF fetch.
    pub download_timeout: Duration,
    /// Maximum simultaneous PDF downloads (1 = sequential).
    pub concurrency: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            cache_path: PathBuf::from(DEFAULT_CACHE_PATH),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            page_timeout: Duration::from_secs(PAGE_TIMEOUT_SECS),
            download_timeout: Duration::from_secs(DOWNLOAD_TIMEOUT_SECS),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl PipelineConfig {
    /// Validates ranges that the CLI also enforces, for library callers.
    ///
    /// Concurrency is checked where the worker pool is built
    /// ([`DownloadEngine::new`](crate::download::DownloadEngine::new)).
    ///
    /// A malformed (but non-empty) source URL is not a configuration error:
    /// the page cache skips the fetch and the run reports the page as unavailable.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source_url.trim().is_empty() {
            return Err(ConfigError::EmptySourceUrl);
        }
        validate_timeout("page timeout", self.page_timeout)?;
        validate_timeout("download timeout", self.download_timeout)?;
        Ok(())
    }

    /// Timeouts in the form the HTTP client takes them.
    #[must_use]
    pub fn http_timeouts(&self) -> HttpTimeouts {
        HttpTimeouts {
            page: self.page_timeout,
            download: self.download_timeout,
        }
    }
}

fn validate_timeout(field: &'static str, timeout: Duration) -> Result<(), ConfigError> {
    let secs = timeout.as_secs();
    if timeout.is_zero() || secs > MAX_TIMEOUT_SECS {
        return Err(ConfigError::Timeout { field, secs });
    }
    Ok(())
}
