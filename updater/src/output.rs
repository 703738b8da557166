//! Output emitted by the updater: the manifest file and progress lines.
//!
//! The manifest is written to a temporary file in the destination directory
//! and renamed over the destination only once fully written, so a failed run
//! never leaves a truncated manifest behind.

use crate::error::{ManifestError, Result};
use camino::Utf8Path;
use std::io::Write;
use tempfile::NamedTempFile;

/// Atomically replace the file at `path` with `contents`.
///
/// The parent directory must already exist.
///
/// # Errors
///
/// Returns [`ManifestError::WriteManifest`] if the temporary file cannot be
/// created or written, or the rename fails.
pub fn write_atomically(path: &Utf8Path, contents: &str) -> Result<()> {
    let to_write_error = |source: std::io::Error| ManifestError::WriteManifest {
        path: path.to_owned(),
        source,
    };

    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };

    let mut file = NamedTempFile::new_in(parent).map_err(to_write_error)?;
    file.write_all(contents.as_bytes()).map_err(to_write_error)?;
    file.as_file().sync_all().map_err(to_write_error)?;
    file.persist(path).map_err(|e| to_write_error(e.error))?;

    log::debug!("wrote {} bytes to {path}", contents.len());
    Ok(())
}

/// Write one progress line to `stderr`.
///
/// Progress output is best-effort; write failures are ignored.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}
