//! Constants for the download module (timeouts, content gates, file modes).

/// Default total timeout for a single PDF request, body included (30 seconds).
pub const DOWNLOAD_TIMEOUT_SECS: u64 = 30;

/// Default total timeout for the source page request (30 seconds).
pub const PAGE_TIMEOUT_SECS: u64 = 30;

/// Substring the `Content-Type` header must contain for a body to be persisted.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Extension every output filename ends with.
pub const PDF_EXTENSION: &str = ".pdf";

/// Permission bits for written files (cached page and PDFs).
pub const FILE_MODE: u32 = 0o644;

/// Permission bits for the created output directory.
pub const DIR_MODE: u32 = 0o755;
