//! Download engine: per-link download steps and the bounded worker pool.
//!
//! [`download_pdf`] runs the guarded steps for a single link. The
//! [`DownloadEngine`] applies it to every link, one at a time by default or
//! through a semaphore-bounded pool of tokio tasks, and returns one
//! [`ItemReport`] per link in input order.
//!
//! # Example
//!
//! ```no_run
//! use pdfharvest_core::download::{DownloadEngine, HttpClient, HttpTimeouts};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new(HttpTimeouts::default())?;
//! let engine = DownloadEngine::new(1)?;
//! let links = vec!["https://example.com/sds/acetone.pdf".to_string()];
//! let reports = engine.run(&client, links, Path::new("PDFs")).await;
//! println!("{} item(s) processed", reports.len());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};

use super::error::{DownloadError, FailureKind};
use super::filename::url_to_filename;
use super::persistence::{WriteOutcome, is_regular_file, write_new_file};
use super::HttpClient;

/// Minimum allowed concurrency value.
pub const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed concurrency value.
pub const MAX_CONCURRENCY: usize = 100;

/// Default concurrency: strictly sequential.
pub const DEFAULT_CONCURRENCY: usize = 1;

/// Error type for download engine construction.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Invalid concurrency value provided.
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}"
    )]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },
}

/// Successful result of [`download_pdf`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The PDF was fetched and written.
    Downloaded {
        /// Written file.
        path: PathBuf,
        /// Number of bytes written.
        bytes: u64,
    },
    /// The target file already existed; no request was made.
    AlreadyPresent {
        /// Existing file.
        path: PathBuf,
    },
}

/// Per-link status recorded in a run summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemStatus {
    /// Fetched and written.
    Downloaded {
        /// Written file.
        path: PathBuf,
        /// Number of bytes written.
        bytes: u64,
    },
    /// Target already present.
    Skipped {
        /// Existing file.
        path: PathBuf,
    },
    /// Aborted at one of the guarded steps.
    Failed {
        /// Failure classification.
        kind: FailureKind,
        /// Human-readable error.
        message: String,
    },
}

/// Outcome of one link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemReport {
    /// The link as extracted from the page.
    pub url: String,
    /// What happened to it.
    #[serde(flatten)]
    pub status: ItemStatus,
}

impl ItemReport {
    /// Builds a report from the result of [`download_pdf`].
    #[must_use]
    pub fn from_result(url: impl Into<String>, result: Result<DownloadOutcome, DownloadError>) -> Self {
        let status = match result {
            Ok(DownloadOutcome::Downloaded { path, bytes }) => ItemStatus::Downloaded { path, bytes },
            Ok(DownloadOutcome::AlreadyPresent { path }) => ItemStatus::Skipped { path },
            Err(error) => ItemStatus::Failed {
                kind: error.kind(),
                message: error.to_string(),
            },
        };
        Self {
            url: url.into(),
            status,
        }
    }

    /// Returns true if the item ended in failure.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self.status, ItemStatus::Failed { .. })
    }
}

/// Downloads one PDF link into `output_dir`.
///
/// Steps, each short-circuiting on failure:
/// 1. derive the target filename (unparsable URL is a validation failure)
/// 2. skip without any request if the target already exists
/// 3. fetch with status, content-type and empty-body gates
/// 4. create the file exclusively and write the buffered bytes
///
/// # Errors
///
/// Returns the [`DownloadError`] of the first failing step. No file is
/// created unless the full, validated body is in memory.
#[instrument(skip(client, output_dir), fields(url = %url))]
pub async fn download_pdf(
    client: &HttpClient,
    url: &str,
    output_dir: &Path,
) -> Result<DownloadOutcome, DownloadError> {
    let filename = url_to_filename(url).ok_or_else(|| DownloadError::invalid_url(url))?;
    let path = output_dir.join(filename);

    if is_regular_file(&path).await {
        info!(path = %path.display(), "file already exists, skipping");
        return Ok(DownloadOutcome::AlreadyPresent { path });
    }

    let body = client.fetch_pdf(url).await?;

    match write_new_file(&path, &body).await? {
        WriteOutcome::Written => {
            let bytes = body.len() as u64;
            info!(bytes, url = %url, path = %path.display(), "successfully downloaded");
            Ok(DownloadOutcome::Downloaded { path, bytes })
        }
        WriteOutcome::AlreadyExists => {
            info!(path = %path.display(), "file appeared during download, keeping existing copy");
            Ok(DownloadOutcome::AlreadyPresent { path })
        }
    }
}

/// Applies [`download_pdf`] to a list of links with bounded concurrency.
///
/// With concurrency 1 each link completes before the next one starts. Higher
/// values run up to that many downloads as tokio tasks at once. Either way
/// the returned reports follow input order and one failing link never stops
/// the others.
#[derive(Debug)]
pub struct DownloadEngine {
    semaphore: Arc<Semaphore>,
    concurrency: usize,
}

impl DownloadEngine {
    /// Creates a new engine.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConcurrency`] if the value is outside
    /// the valid range (1-100).
    pub fn new(concurrency: usize) -> Result<Self, EngineError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(EngineError::InvalidConcurrency { value: concurrency });
        }

        debug!(concurrency, "creating download engine");

        Ok(Self {
            semaphore: Arc::new(Semaphore::new(concurrency)),
            concurrency,
        })
    }

    /// Returns the configured concurrency limit.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Downloads every link and waits for all of them to finish.
    #[instrument(skip(self, client, links), fields(links = links.len(), output_dir = %output_dir.display()))]
    pub async fn run(
        &self,
        client: &HttpClient,
        links: Vec<String>,
        output_dir: &Path,
    ) -> Vec<ItemReport> {
        let mut handles = Vec::with_capacity(links.len());

        for url in links {
            // The semaphore is owned by self and never closed.
            let Ok(permit) = Arc::clone(&self.semaphore).acquire_owned().await else {
                warn!(url = %url, "download pool closed");
                break;
            };

            let client = client.clone();
            let output_dir = output_dir.to_path_buf();
            let task_url = url.clone();

            let handle = tokio::spawn(async move {
                let _permit = permit;
                let result = download_pdf(&client, &task_url, &output_dir).await;
                if let Err(e) = &result {
                    warn!(url = %task_url, kind = %e.kind(), error = %e, "download failed");
                }
                ItemReport::from_result(task_url, result)
            });
            handles.push((url, handle));
        }

        let mut reports = Vec::with_capacity(handles.len());
        for (url, handle) in handles {
            match handle.await {
                Ok(report) => reports.push(report),
                Err(e) => {
                    warn!(url = %url, error = %e, "download task panicked");
                    reports.push(ItemReport {
                        url,
                        status: ItemStatus::Failed {
                            kind: FailureKind::Transport,
                            message: format!("download task aborted: {e}"),
                        },
                    });
                }
            }
        }

        reports
    }
}
