//! Rewrite rules applied to the upstream manifest.
//!
//! The rules visit each direct child of the root once, in document order:
//!
//! - `Version` is pinned to the `master` branch and the `any` platform.
//! - `Source` entries labelled `default` become `origin` and lose their
//!   `platform` restriction.
//! - `File` entries labelled `default` become `origin`. Runtime binaries,
//!   fonts, and archives are dropped, and `UpdateCheck.lua` is re-pointed at
//!   the locally modified copy with a fresh SHA-1.
//!
//! A new `default` source pointing at this repository is then inserted
//! directly after the `Version` element.

use crate::digest::Sha1Digest;
use crate::document::{Element, Manifest};
use crate::error::Result;
use crate::game::{Game, UPDATE_SCRIPT_FILENAME};
use camino::Utf8Path;
use std::fmt;

const VERSION_TAG: &str = "Version";
const SOURCE_TAG: &str = "Source";
const FILE_TAG: &str = "File";

const PART: &str = "part";
const PLATFORM: &str = "platform";
const PART_DEFAULT: &str = "default";
const PART_ORIGIN: &str = "origin";

/// Root position of the injected default source, directly after `Version`.
const DEFAULT_SOURCE_INDEX: usize = 1;

/// Counts of what a rewrite changed, for progress reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteSummary {
    /// Number of `Source`/`File` entries relabelled from `default` to `origin`.
    ///
    /// The update script is not counted; it always leaves as `part="default"`.
    pub relabelled: usize,
    /// Number of `Source` entries whose `platform` attribute was removed.
    pub platforms_stripped: usize,
    /// Names of the `File` entries removed from the manifest.
    pub removed_files: Vec<String>,
    /// Digest written for the update script, if the manifest lists it.
    pub script_digest: Option<Sha1Digest>,
}

impl fmt::Display for RewriteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "relabelled {} entries as origin, stripped platform from {} sources, removed {} files",
            self.relabelled,
            self.platforms_stripped,
            self.removed_files.len()
        )?;
        match &self.script_digest {
            Some(digest) => write!(f, ", {UPDATE_SCRIPT_FILENAME} sha1 {digest}"),
            None => write!(f, ", {UPDATE_SCRIPT_FILENAME} not listed"),
        }
    }
}

enum ElementKind {
    Version,
    Source,
    File,
    Other,
}

impl ElementKind {
    fn of(element: &Element) -> Self {
        match element.name() {
            VERSION_TAG => Self::Version,
            SOURCE_TAG => Self::Source,
            FILE_TAG => Self::File,
            _ => Self::Other,
        }
    }
}

/// Rewrite `manifest` for `game`, hashing the update script at `script_path`.
///
/// The script is only read if the manifest lists `UpdateCheck.lua`.
///
/// # Errors
///
/// Returns [`crate::error::ManifestError::ReadScript`] if the script is
/// listed but cannot be read.
pub fn rewrite(
    manifest: &mut Manifest,
    game: Game,
    script_path: &Utf8Path,
) -> Result<RewriteSummary> {
    rewrite_with(manifest, game, || Sha1Digest::of_file(script_path))
}

/// Rewrite `manifest` for `game`, obtaining the update script's digest from
/// `script_digest` when the manifest lists it.
///
/// # Errors
///
/// Propagates any error returned by `script_digest`.
///
/// # Examples
///
/// ```
/// use pob_manifest_updater::digest::Sha1Digest;
/// use pob_manifest_updater::document::Manifest;
/// use pob_manifest_updater::game::Game;
/// use pob_manifest_updater::rules::rewrite_with;
///
/// let mut manifest = Manifest::parse(br#"<PoBVersion><Version/><File name="Bold.tga"/></PoBVersion>"#)?;
/// let summary = rewrite_with(&mut manifest, Game::Poe1, || Ok(Sha1Digest::of_bytes(b"x")))?;
/// assert_eq!(summary.removed_files, ["Bold.tga"]);
/// # Ok::<(), pob_manifest_updater::error::ManifestError>(())
/// ```
pub fn rewrite_with<F>(
    manifest: &mut Manifest,
    game: Game,
    mut script_digest: F,
) -> Result<RewriteSummary>
where
    F: FnMut() -> Result<Sha1Digest>,
{
    let mut summary = RewriteSummary::default();
    let root = manifest.root_mut();
    let children = std::mem::take(&mut root.children);

    for mut child in children {
        match ElementKind::of(&child) {
            ElementKind::Version => pin_version(&mut child),
            ElementKind::Source => rewrite_source(&mut child, &mut summary),
            ElementKind::File => {
                if !rewrite_file(&mut child, &mut summary, &mut script_digest)? {
                    continue;
                }
            }
            ElementKind::Other => {}
        }
        root.children.push(child);
    }

    let index = DEFAULT_SOURCE_INDEX.min(root.children.len());
    root.children.insert(index, default_source(game));
    log::debug!("inserted default source for {game} at position {index}");

    Ok(summary)
}

/// Build the `Source` element that makes this repository the default origin.
#[must_use]
pub fn default_source(game: Game) -> Element {
    Element::new(SOURCE_TAG)
        .with_attribute(PART, PART_DEFAULT)
        .with_attribute("url", game.hosted_url())
}

/// Return whether `name` is a bitmap font or font table.
#[must_use]
pub fn is_font_asset(name: &str) -> bool {
    name.ends_with(".tga") || name.ends_with(".tgf")
}

/// Return whether `name` is an archive asset.
#[must_use]
pub fn is_archive_asset(name: &str) -> bool {
    name.ends_with(".tar") || name.ends_with(".tgf")
}

fn pin_version(version: &mut Element) {
    version.set_attribute("branch", "master");
    version.set_attribute(PLATFORM, "any");
}

fn rewrite_source(source: &mut Element, summary: &mut RewriteSummary) {
    relabel_default(source, summary);
    if source.remove_attribute(PLATFORM).is_some() {
        summary.platforms_stripped += 1;
    }
}

/// Apply the `File` rules; returns `false` when the element must be dropped.
fn rewrite_file<F>(
    file: &mut Element,
    summary: &mut RewriteSummary,
    script_digest: &mut F,
) -> Result<bool>
where
    F: FnMut() -> Result<Sha1Digest>,
{
    let is_update_script = file.attribute("name") == Some(UPDATE_SCRIPT_FILENAME);
    if !is_update_script {
        relabel_default(file, summary);
    }

    if is_unwanted_file(file) {
        let name = file.attribute("name").unwrap_or_default().to_owned();
        log::trace!("removing file entry {name:?}");
        summary.removed_files.push(name);
        return Ok(false);
    }

    if is_update_script {
        let digest = script_digest()?;
        file.set_attribute(PART, PART_DEFAULT);
        file.set_attribute("sha1", digest.as_str());
        summary.script_digest = Some(digest);
    }

    Ok(true)
}

fn is_unwanted_file(file: &Element) -> bool {
    file.has_attribute("runtime")
        || file
            .attribute("name")
            .is_some_and(|name| is_font_asset(name) || is_archive_asset(name))
}

fn relabel_default(element: &mut Element, summary: &mut RewriteSummary) {
    if element.attribute(PART) == Some(PART_DEFAULT) {
        element.set_attribute(PART, PART_ORIGIN);
        summary.relabelled += 1;
    }
}

#[cfg(test)]
#[path = "rules_tests.rs"]
mod tests;
