//! SHA-1 digest of the substituted update script.
//!
//! The PoB updater checks each downloaded file against the `sha1` attribute
//! recorded in the manifest, so the digest must cover the script's raw bytes
//! exactly as they are served.

use crate::error::{ManifestError, Result};
use camino::Utf8Path;
use sha1::{Digest, Sha1};
use std::fmt;

/// A hex-encoded SHA-1 digest string (40 lowercase hex characters).
///
/// # Examples
///
/// ```
/// use pob_manifest_updater::digest::Sha1Digest;
///
/// let digest = Sha1Digest::of_bytes(b"x");
/// assert_eq!(digest.as_str(), "11f6ad8ec52a2984abaafd7c3b516503785c2072");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sha1Digest(String);

impl Sha1Digest {
    /// Compute the digest of `data`.
    #[must_use]
    pub fn of_bytes(data: &[u8]) -> Self {
        Self(format!("{:x}", Sha1::digest(data)))
    }

    /// Read the file at `path` and compute the digest of its bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::ReadScript`] if the file cannot be read.
    pub fn of_file(path: &Utf8Path) -> Result<Self> {
        let data = std::fs::read(path).map_err(|source| ManifestError::ReadScript {
            path: path.to_owned(),
            source,
        })?;
        log::trace!("hashing {} bytes from {path}", data.len());
        Ok(Self::of_bytes(&data))
    }

    /// Return the digest as a hex string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sha1Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
