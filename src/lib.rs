//! pdfharvest core library
//!
//! Fetches one web page, extracts every absolute link ending in `.pdf`, and
//! downloads each unique PDF into a local directory, skipping files that are
//! already present.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`cache`] - Fetch-once local copy of the source page
//! - [`parser`] - Line-oriented PDF link extraction
//! - [`download`] - Filename derivation, guarded HTTP fetches, file writes, worker pool
//! - [`pipeline`] - Wires the stages together from a [`PipelineConfig`]
//! - [`summary`] - Per-run outcome and exit-code mapping

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod config;
pub mod download;
pub mod parser;
pub mod pipeline;
pub mod summary;

// Re-export commonly used types
pub use cache::{CacheStatus, ensure_cached};
pub use config::{ConfigError, PipelineConfig};
pub use download::{
    DEFAULT_CONCURRENCY, DownloadEngine, DownloadError, DownloadOutcome, FailureKind, HttpClient,
    HttpTimeouts, ItemReport, ItemStatus, download_pdf, url_to_filename,
};
pub use parser::extract_pdf_links;
pub use pipeline::{PipelineError, PlannedDownload, plan_downloads, run_pipeline, run_with_client};
pub use summary::{PageStatus, ProcessExit, RunSummary};
