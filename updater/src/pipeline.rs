//! End-to-end manifest update: fetch, parse, rewrite, and write.
//!
//! Each step completes before the next starts and any failure aborts the
//! run. The only state is the document tree, which lives for one call.

use crate::document::Manifest;
use crate::error::Result;
use crate::fetch::ManifestFetcher;
use crate::game::Game;
use crate::output::{write_atomically, write_stderr_line};
use crate::rules::{RewriteSummary, rewrite};
use camino::{Utf8Path, Utf8PathBuf};
use std::io::Write;

/// Result of a successful manifest update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Path of the manifest that was written.
    pub manifest_path: Utf8PathBuf,
    /// What the rewrite changed.
    pub summary: RewriteSummary,
}

/// Fetch the upstream manifest for `game`, rewrite it, and write it to
/// `<root>/<game>/manifest.xml`.
///
/// The update script is read from `<root>/<game>/UpdateCheck.lua`. Progress
/// lines are written to `stderr`.
///
/// # Errors
///
/// Returns [`crate::error::ManifestError::Network`] if the fetch fails,
/// [`crate::error::ManifestError::Parse`] if the upstream document is not
/// well-formed, and [`crate::error::ManifestError::ReadScript`] or
/// [`crate::error::ManifestError::WriteManifest`] on local I/O failures.
pub fn update_manifest(
    fetcher: &dyn ManifestFetcher,
    game: Game,
    root: &Utf8Path,
    stderr: &mut dyn Write,
) -> Result<UpdateOutcome> {
    let url = game.upstream_url();
    write_stderr_line(stderr, format!("Fetching {url}..."));
    let bytes = fetcher.fetch(url)?;

    let mut manifest = Manifest::parse(&bytes)?;
    log::debug!(
        "parsed upstream manifest with {} root children",
        manifest.root().children.len()
    );

    let summary = rewrite(&mut manifest, game, &game.update_script_path(root))?;
    let xml = manifest.to_xml()?;

    let manifest_path = game.manifest_path(root);
    write_atomically(&manifest_path, &xml)?;
    write_stderr_line(stderr, format!("Wrote {manifest_path}"));

    Ok(UpdateOutcome {
        manifest_path,
        summary,
    })
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
