//! Harvest pipeline: page cache → link extraction → per-link download.
//!
//! Individual failures (page or link) never abort the run; they are logged
//! and recorded in the returned [`RunSummary`]. Only setup problems surface
//! as [`PipelineError`].
//!
//! # Example
//!
//! ```no_run
//! use pdfharvest_core::{PipelineConfig, ProcessExit, run_pipeline};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let summary = run_pipeline(&PipelineConfig::default()).await?;
//! println!(
//!     "downloaded {}, skipped {}, failed {}",
//!     summary.downloaded(),
//!     summary.skipped(),
//!     summary.failed()
//! );
//! std::process::exit(i32::from(ProcessExit::from_summary(&summary).code()));
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::cache::{CacheStatus, ensure_cached, read_cached_page};
use crate::config::{ConfigError, PipelineConfig};
use crate::download::{
    DownloadEngine, EngineError, HttpClient, ensure_output_dir, is_regular_file, url_to_filename,
};
use crate::parser::extract_pdf_links;
use crate::summary::{PageStatus, RunSummary};

/// Setup failures that prevent a run from starting.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Configuration values out of range.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Worker pool could not be created.
    #[error("download engine error: {0}")]
    Engine(#[from] EngineError),

    /// HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// A link as it would be handled by a real run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedDownload {
    /// Extracted link.
    pub url: String,
    /// Target path, `None` when no filename can be derived.
    pub target: Option<PathBuf>,
    /// Whether the target already exists (the link would be skipped).
    pub exists: bool,
}

/// Runs the full harvest described by `config`.
///
/// # Errors
///
/// Returns [`PipelineError`] only for invalid configuration or when the
/// HTTP client cannot be built.
pub async fn run_pipeline(config: &PipelineConfig) -> Result<RunSummary, PipelineError> {
    config.validate()?;
    let client = HttpClient::new(config.http_timeouts()).map_err(PipelineError::HttpClient)?;
    let engine = DownloadEngine::new(config.concurrency)?;
    Ok(run_with_client(&client, &engine, config).await)
}

/// Runs the harvest with an existing client and engine.
#[instrument(skip_all, fields(source = %config.source_url, output_dir = %config.output_dir.display()))]
pub async fn run_with_client(
    client: &HttpClient,
    engine: &DownloadEngine,
    config: &PipelineConfig,
) -> RunSummary {
    let (page, links) = load_links(client, config).await;

    if let Err(error) = ensure_output_dir(&config.output_dir).await {
        // Each write into the directory will fail and be reported individually.
        warn!(%error, "could not create output directory");
    }

    let links_found = links.len();
    let items = engine.run(client, links, &config.output_dir).await;

    let summary = RunSummary {
        source_url: config.source_url.clone(),
        page,
        links_found,
        items,
    };

    info!(
        links = summary.links_found,
        downloaded = summary.downloaded(),
        skipped = summary.skipped(),
        failed = summary.failed(),
        bytes = summary.bytes_downloaded(),
        "harvest complete"
    );

    summary
}

/// Ensures the page cache and lists what a run would do, without downloading any PDF.
///
/// # Errors
///
/// Same setup errors as [`run_pipeline`].
pub async fn plan_downloads(
    config: &PipelineConfig,
) -> Result<(PageStatus, Vec<PlannedDownload>), PipelineError> {
    config.validate()?;
    let client = HttpClient::new(config.http_timeouts()).map_err(PipelineError::HttpClient)?;
    let (page, links) = load_links(&client, config).await;

    let mut planned = Vec::with_capacity(links.len());
    for url in links {
        let target = url_to_filename(&url).map(|name| config.output_dir.join(name));
        let exists = match &target {
            Some(path) => is_regular_file(path).await,
            None => false,
        };
        planned.push(PlannedDownload {
            url,
            target,
            exists,
        });
    }

    Ok((page, planned))
}

/// Ensures the cached page and extracts its PDF links.
async fn load_links(client: &HttpClient, config: &PipelineConfig) -> (PageStatus, Vec<String>) {
    let page = match ensure_cached(client, &config.source_url, &config.cache_path).await {
        Ok(CacheStatus::Hit) => PageStatus::Cached,
        Ok(CacheStatus::Fetched { bytes }) => PageStatus::Fetched { bytes },
        Ok(CacheStatus::InvalidUrl) => PageStatus::InvalidUrl,
        Err(error) => {
            warn!(url = %config.source_url, kind = %error.kind(), %error, "failed to cache source page");
            PageStatus::Failed {
                kind: error.kind(),
                message: error.to_string(),
            }
        }
    };

    if !page.is_available() {
        return (page, Vec::new());
    }

    let Some(html) = read_cached_page(&config.cache_path).await else {
        return (PageStatus::Unreadable, Vec::new());
    };

    let links = extract_pdf_links(&html);
    info!(count = links.len(), "found PDF links");
    (page, links)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn offline_config(temp_dir: &TempDir) -> PipelineConfig {
        PipelineConfig {
            // Never contacted: the cache file is seeded by each test.
            source_url: "http://127.0.0.1:9/unused".to_string(),
            cache_path: temp_dir.path().join("page.html"),
            output_dir: temp_dir.path().join("PDFs"),
            ..PipelineConfig::default()
        }
    }

    #[tokio::test]
    async fn test_run_pipeline_rejects_invalid_config() {
        let config = PipelineConfig {
            download_timeout: std::time::Duration::ZERO,
            ..PipelineConfig::default()
        };
        let result = run_pipeline(&config).await;
        assert!(matches!(result, Err(PipelineError::Config(_))));
    }

    #[tokio::test]
    async fn test_run_pipeline_rejects_out_of_range_concurrency() {
        for concurrency in [0, 101] {
            let config = PipelineConfig {
                concurrency,
                ..PipelineConfig::default()
            };
            let result = run_pipeline(&config).await;
            assert!(
                matches!(
                    result,
                    Err(PipelineError::Engine(EngineError::InvalidConcurrency { value })) if value == concurrency
                ),
                "got {result:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_run_pipeline_invalid_source_url_reports_page_failure() {
        let temp_dir = TempDir::new().unwrap();
        let config = PipelineConfig {
            source_url: "not a url".to_string(),
            ..offline_config(&temp_dir)
        };

        let summary = run_pipeline(&config).await.unwrap();
        assert_eq!(summary.page, PageStatus::InvalidUrl);
        assert_eq!(summary.total(), 0);
        assert!(!config.cache_path.exists());
    }

    #[tokio::test]
    async fn test_run_pipeline_page_without_links_downloads_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let config = offline_config(&temp_dir);
        std::fs::write(&config.cache_path, "<html><a href=\"/about\">about</a></html>").unwrap();

        let summary = run_pipeline(&config).await.unwrap();
        assert_eq!(summary.page, PageStatus::Cached);
        assert_eq!(summary.links_found, 0);
        assert!(config.output_dir.is_dir());
        assert_eq!(std::fs::read_dir(&config.output_dir).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_run_pipeline_existing_files_are_skipped_offline() {
        let temp_dir = TempDir::new().unwrap();
        let config = offline_config(&temp_dir);
        std::fs::write(
            &config.cache_path,
            "<a href=\"https://x.invalid/a.pdf\">a</a>\n<a href=\"https://x.invalid/a.pdf\">a</a>",
        )
        .unwrap();
        std::fs::create_dir_all(&config.output_dir).unwrap();
        let target = config.output_dir.join("x.invalid__a.pdf");
        std::fs::write(&target, b"%PDF existing").unwrap();

        let summary = run_pipeline(&config).await.unwrap();
        assert_eq!(summary.links_found, 1);
        assert_eq!(summary.skipped(), 1);
        assert_eq!(std::fs::read(&target).unwrap(), b"%PDF existing");
    }

    #[tokio::test]
    async fn test_plan_downloads_lists_targets_without_downloading() {
        let temp_dir = TempDir::new().unwrap();
        let config = offline_config(&temp_dir);
        std::fs::write(
            &config.cache_path,
            "https://x.invalid/A.pdf https://x.invalid/b.pdf?v=2",
        )
        .unwrap();

        let (page, planned) = plan_downloads(&config).await.unwrap();
        assert_eq!(page, PageStatus::Cached);
        assert_eq!(planned.len(), 2);
        assert_eq!(
            planned[0].target.as_deref(),
            Some(config.output_dir.join("x.invalid__a.pdf").as_path())
        );
        assert_eq!(
            planned[1].target.as_deref(),
            Some(config.output_dir.join("x.invalid__b.pdf_v=2.pdf").as_path())
        );
        assert!(planned.iter().all(|p| !p.exists));
        assert!(!config.output_dir.exists());
    }
}
