//! PDF download support: HTTP fetching, filename derivation and persistence.
//!
//! # Features
//!
//! - Bodies buffered in memory before any file is opened
//! - Status (`200 OK`), content-type (`application/pdf`) and non-empty gates
//! - Flat, lowercase filenames derived from host, path and query
//! - Existing files are skipped without a request and never overwritten
//! - Sequential by default, optional bounded worker pool
//!
//! # Example
//!
//! ```no_run
//! use pdfharvest_core::download::{HttpClient, HttpTimeouts, download_pdf};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new(HttpTimeouts::default())?;
//! let outcome = download_pdf(&client, "https://example.com/sds/acetone.pdf", Path::new("PDFs")).await?;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

mod client;
pub mod constants;
mod engine;
mod error;
mod filename;
mod persistence;

pub use client::{HttpClient, HttpTimeouts};
pub use engine::{
    DEFAULT_CONCURRENCY, DownloadEngine, DownloadOutcome, EngineError, ItemReport, ItemStatus,
    MAX_CONCURRENCY, MIN_CONCURRENCY, download_pdf,
};
pub use error::{DownloadError, FailureKind};
pub use filename::url_to_filename;
pub use persistence::ensure_output_dir;
pub(crate) use persistence::{is_regular_file, write_file};

// Note: no module-local Result aliases; use `Result<T, DownloadError>` explicitly.
