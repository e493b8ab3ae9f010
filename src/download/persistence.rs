//! Filesystem helpers: output directory creation and buffered file writes.

use std::io::ErrorKind;
use std::path::Path;

use tokio::fs::{DirBuilder, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::constants::{DIR_MODE, FILE_MODE};
use super::error::DownloadError;

/// Result of an exclusive write attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WriteOutcome {
    /// The file was created and the whole buffer written.
    Written,
    /// Another writer created the path first; nothing was written.
    AlreadyExists,
}

/// Returns true when `path` exists and is a regular file.
pub(crate) async fn is_regular_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|metadata| metadata.is_file())
}

/// Creates `dir` (and missing parents) with mode `0755`.
///
/// # Errors
///
/// Returns [`DownloadError::Io`] if the directory cannot be created.
pub async fn ensure_output_dir(dir: &Path) -> Result<(), DownloadError> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(DIR_MODE);
    #[cfg(not(unix))]
    let _ = DIR_MODE;

    builder
        .create(dir)
        .await
        .map_err(|e| DownloadError::io(dir, e))
}

/// Creates `path` exclusively with mode `0644` and writes `bytes` in full.
///
/// A partially written file is removed before the error is returned.
pub(crate) async fn write_new_file(path: &Path, bytes: &[u8]) -> Result<WriteOutcome, DownloadError> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    apply_file_mode(&mut options);

    let file = match options.open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(WriteOutcome::AlreadyExists),
        Err(e) => return Err(DownloadError::io(path, e)),
    };

    write_or_remove(file, path, bytes).await?;
    Ok(WriteOutcome::Written)
}

/// Writes `bytes` to `path` with mode `0644`, replacing any previous content.
///
/// On a failed write the file is removed rather than left truncated.
pub(crate) async fn write_file(path: &Path, bytes: &[u8]) -> Result<(), DownloadError> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    apply_file_mode(&mut options);

    let file = options
        .open(path)
        .await
        .map_err(|e| DownloadError::io(path, e))?;
    write_or_remove(file, path, bytes).await
}

/// Writes the whole buffer into `file`, removing `path` if any write fails.
async fn write_or_remove(
    mut file: tokio::fs::File,
    path: &Path,
    bytes: &[u8],
) -> Result<(), DownloadError> {
    let write_result = async {
        file.write_all(bytes).await?;
        file.flush().await
    }
    .await;

    if let Err(e) = write_result {
        debug!(path = %path.display(), "cleaning up partial file after write error");
        drop(file);
        let _ = tokio::fs::remove_file(path).await;
        return Err(DownloadError::io(path, e));
    }

    Ok(())
}

fn apply_file_mode(options: &mut OpenOptions) {
    #[cfg(unix)]
    options.mode(FILE_MODE);
    #[cfg(not(unix))]
    let _ = (options, FILE_MODE);
}
