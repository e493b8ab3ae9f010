//! CLI entry point for pdfharvest.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use pdfharvest_core::{PageStatus, ProcessExit, RunSummary, plan_downloads, run_pipeline};
use tracing::{debug, error, info, warn};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(args.default_log_level()));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    debug!(?args, "CLI arguments parsed");
    info!(url = %args.url, output_dir = %args.output_dir.display(), "pdfharvest starting");

    let config = args.pipeline_config();

    if args.dry_run {
        return run_dry_run(&config).await;
    }

    let summary = run_pipeline(&config).await?;

    let exit = ProcessExit::from_summary(&summary);
    if !args.quiet {
        print_summary(&summary);
    }
    if exit != ProcessExit::Success {
        warn!(?exit, failed = summary.failed(), "harvest finished with failures");
    }

    // The exit code reflects the harvest only; a lost report is logged.
    if let Some(path) = &args.summary_json
        && let Err(e) = write_summary_json(&summary, path)
    {
        error!(error = %format!("{e:#}"), "run summary not written");
    }

    Ok(ExitCode::from(exit.code()))
}

async fn run_dry_run(config: &pdfharvest_core::PipelineConfig) -> Result<ExitCode> {
    let (page, planned) = plan_downloads(config).await?;

    if !page.is_available() {
        println!("Dry run - source page unavailable ({})", describe_page(&page));
        return Ok(ExitCode::from(ProcessExit::Failure.code()));
    }

    println!("Dry run preview: {} PDF link(s) found.", planned.len());
    for item in &planned {
        match &item.target {
            Some(target) if item.exists => {
                println!("- [exists] {} -> {}", item.url, target.display());
            }
            Some(target) => println!("- [new] {} -> {}", item.url, target.display()),
            None => println!("- [invalid] {} -> no filename", item.url),
        }
    }
    println!("Dry run - no files downloaded");
    Ok(ExitCode::SUCCESS)
}

fn write_summary_json(summary: &RunSummary, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(summary).context("Failed to serialize run summary")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write run summary to '{}'", path.display()))?;
    debug!(path = %path.display(), "wrote run summary");
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!(
        "Source page: {} ({})",
        summary.source_url,
        describe_page(&summary.page)
    );
    println!(
        "{} link(s): {} downloaded, {} already present, {} failed",
        summary.links_found,
        summary.downloaded(),
        summary.skipped(),
        summary.failed()
    );
}

fn describe_page(page: &PageStatus) -> String {
    match page {
        PageStatus::Cached => "cached".to_string(),
        PageStatus::Fetched { bytes } => format!("fetched {bytes} bytes"),
        PageStatus::InvalidUrl => "invalid URL".to_string(),
        PageStatus::Failed { message, .. } => format!("failed: {message}"),
        PageStatus::Unreadable => "cache file unreadable".to_string(),
    }
}
