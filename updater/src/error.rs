//! Error types for the manifest updater.
//!
//! Every failure aborts the run. The variants group into four kinds: an
//! unknown game selector, a failed fetch, malformed upstream XML, and local
//! file I/O. Each variant carries enough context (path, URL, or reason) to
//! produce a useful one-line diagnostic.

use crate::fetch::FetchError;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while rewriting a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The game selector is not one of the known variants.
    #[error("unknown game \"{value}\"; expected one of: {expected}")]
    InvalidGame {
        /// The rejected selector.
        value: String,
        /// Comma-separated list of accepted selectors.
        expected: String,
    },

    /// The upstream manifest could not be fetched.
    #[error(transparent)]
    Network(#[from] FetchError),

    /// The upstream manifest is not well-formed UTF-8 XML.
    #[error("failed to parse manifest: {reason}")]
    Parse {
        /// Description of the parse failure.
        reason: String,
    },

    /// The manifest could not be serialized back to XML.
    #[error("failed to serialize manifest: {reason}")]
    Serialize {
        /// Description of the writer failure.
        reason: String,
    },

    /// The local update script could not be read for hashing.
    #[error("failed to read update script at {path}")]
    ReadScript {
        /// Path of the script that was read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The rewritten manifest could not be written to disk.
    #[error("failed to write manifest to {path}")]
    WriteManifest {
        /// Destination path of the manifest.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The working directory could not be resolved as a UTF-8 path.
    #[error("cannot use working directory: {reason}")]
    WorkingDirectory {
        /// Description of the failure.
        reason: String,
    },
}

impl ManifestError {
    /// Construct a [`ManifestError::Parse`] from any displayable cause.
    pub(crate) fn parse(reason: impl std::fmt::Display) -> Self {
        Self::Parse {
            reason: reason.to_string(),
        }
    }
}

/// Result type alias using [`ManifestError`].
pub type Result<T> = std::result::Result<T, ManifestError>;
