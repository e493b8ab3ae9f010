//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use pdfharvest_core::PipelineConfig;
use pdfharvest_core::config::{DEFAULT_CACHE_PATH, DEFAULT_OUTPUT_DIR, DEFAULT_SOURCE_URL};

/// Harvest every PDF linked from a web page into a local directory.
///
/// The page is fetched once and cached; later runs reuse the cached copy and
/// skip PDFs that are already on disk.
#[derive(Parser, Debug)]
#[command(name = "pdfharvest")]
#[command(author, version, about)]
pub struct Args {
    /// Page to scan for PDF links
    #[arg(short = 'u', long, env = "PDFHARVEST_URL", default_value = DEFAULT_SOURCE_URL)]
    pub url: String,

    /// Local copy of the page; reused instead of fetching while it exists
    #[arg(long, env = "PDFHARVEST_CACHE_FILE", default_value = DEFAULT_CACHE_PATH)]
    pub cache_file: PathBuf,

    /// Directory for downloaded PDFs (created if missing)
    #[arg(short = 'o', long, env = "PDFHARVEST_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Total timeout per PDF download in seconds (1-3600)
    #[arg(short = 't', long, env = "PDFHARVEST_TIMEOUT", default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub timeout: u64,

    /// Total timeout for the page fetch in seconds (1-3600)
    #[arg(long, env = "PDFHARVEST_PAGE_TIMEOUT", default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub page_timeout: u64,

    /// Maximum concurrent downloads (1-100, 1 = sequential)
    #[arg(short = 'c', long, env = "PDFHARVEST_CONCURRENCY", default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub concurrency: u8,

    /// List links and target files without downloading any PDF
    #[arg(long)]
    pub dry_run: bool,

    /// Write the run summary as JSON to this file
    #[arg(long, value_name = "PATH")]
    pub summary_json: Option<PathBuf>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Default log filter from the verbosity flags.
    pub fn default_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }

    /// Builds the pipeline configuration from the parsed flags.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            source_url: self.url.clone(),
            cache_path: self.cache_file.clone(),
            output_dir: self.output_dir.clone(),
            page_timeout: Duration::from_secs(self.page_timeout),
            download_timeout: Duration::from_secs(self.timeout),
            concurrency: usize::from(self.concurrency),
        }
    }
}
