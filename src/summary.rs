//! Run summary and process exit mapping.

use serde::Serialize;

use crate::download::{FailureKind, ItemReport, ItemStatus};

/// What happened to the source page during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PageStatus {
    /// Served from the existing cache file.
    Cached,
    /// Fetched and written to the cache file.
    Fetched {
        /// Bytes written to the cache.
        bytes: u64,
    },
    /// Source URL was not a valid absolute http(s) URL.
    InvalidUrl,
    /// Fetching or caching the page failed.
    Failed {
        /// Failure classification.
        kind: FailureKind,
        /// Human-readable error.
        message: String,
    },
    /// The cache file could not be read back.
    Unreadable,
}

impl PageStatus {
    /// Returns true if the page text was available for link extraction.
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Cached | Self::Fetched { .. })
    }
}

/// Outcome of one harvest run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Page the links came from.
    pub source_url: String,
    /// Source page status.
    pub page: PageStatus,
    /// Unique PDF links found on the page.
    pub links_found: usize,
    /// One report per link, in page order.
    pub items: Vec<ItemReport>,
}

impl RunSummary {
    /// Returns the number of PDFs written during this run.
    #[must_use]
    pub fn downloaded(&self) -> usize {
        self.count(|status| matches!(status, ItemStatus::Downloaded { .. }))
    }

    /// Returns the number of links whose file already existed.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|status| matches!(status, ItemStatus::Skipped { .. }))
    }

    /// Returns the number of failed links.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|status| matches!(status, ItemStatus::Failed { .. }))
    }

    /// Returns the number of links processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.items.len()
    }

    /// Returns the total bytes written during this run.
    #[must_use]
    pub fn bytes_downloaded(&self) -> u64 {
        self.items
            .iter()
            .map(|item| match item.status {
                ItemStatus::Downloaded { bytes, .. } => bytes,
                _ => 0,
            })
            .sum()
    }

    fn count(&self, predicate: impl Fn(&ItemStatus) -> bool) -> usize {
        self.items.iter().filter(|item| predicate(&item.status)).count()
    }
}

/// Process exit outcome derived from a run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessExit {
    /// Nothing failed (including "no links found").
    Success,
    /// Some links failed, others were downloaded or already present.
    Partial,
    /// The page was unavailable, or every link failed.
    Failure,
}

impl ProcessExit {
    /// Maps a summary to an exit outcome.
    #[must_use]
    pub fn from_summary(summary: &RunSummary) -> Self {
        if !summary.page.is_available() {
            return Self::Failure;
        }
        let failed = summary.failed();
        if failed == 0 {
            Self::Success
        } else if failed < summary.total() {
            Self::Partial
        } else {
            Self::Failure
        }
    }

    /// Numeric process exit code.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Partial => 1,
            Self::Failure => 2,
        }
    }
}
