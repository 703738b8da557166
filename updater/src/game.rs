//! Game selection and the fixed locations tied to each game.
//!
//! Path of Building ships two editions, one per game, each with its own
//! upstream manifest. Only these two selectors are accepted. Every URL and
//! local path the updater touches is derived from the selected [`Game`].

use crate::error::{ManifestError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;
use std::str::FromStr;

/// Repository (owner/name) that hosts the rewritten manifests.
pub const HOSTING_REPO: &str = "meehl/rusty-pob-manifest";

/// File name of the manifest, both upstream and in each game directory.
pub const MANIFEST_FILENAME: &str = "manifest.xml";

/// File name of the locally modified update script.
pub const UPDATE_SCRIPT_FILENAME: &str = "UpdateCheck.lua";

const POE1_UPSTREAM: &str =
    "https://raw.githubusercontent.com/PathOfBuildingCommunity/PathOfBuilding/master/manifest.xml";
const POE2_UPSTREAM: &str = "https://raw.githubusercontent.com/PathOfBuildingCommunity/PathOfBuilding-PoE2/master/manifest.xml";

/// The game whose manifest is being rewritten.
///
/// # Examples
///
/// ```
/// use pob_manifest_updater::game::Game;
///
/// let game: Game = "poe2".parse().expect("known game");
/// assert_eq!(game, Game::Poe2);
/// assert_eq!(game.as_str(), "poe2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Game {
    /// Path of Exile.
    #[value(name = "poe1")]
    Poe1,
    /// Path of Exile 2.
    #[value(name = "poe2")]
    Poe2,
}

impl Game {
    /// Every supported game, in selector order.
    pub const ALL: [Self; 2] = [Self::Poe1, Self::Poe2];

    /// Return the selector string, which doubles as the directory name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Poe1 => "poe1",
            Self::Poe2 => "poe2",
        }
    }

    /// Return the URL of the official upstream manifest.
    #[must_use]
    pub const fn upstream_url(self) -> &'static str {
        match self {
            Self::Poe1 => POE1_UPSTREAM,
            Self::Poe2 => POE2_UPSTREAM,
        }
    }

    /// Return the base URL under which this repository serves the game's files.
    ///
    /// # Examples
    ///
    /// ```
    /// use pob_manifest_updater::game::Game;
    ///
    /// assert_eq!(
    ///     Game::Poe1.hosted_url(),
    ///     "https://raw.githubusercontent.com/meehl/rusty-pob-manifest/main/poe1/"
    /// );
    /// ```
    #[must_use]
    pub fn hosted_url(self) -> String {
        format!(
            "https://raw.githubusercontent.com/{HOSTING_REPO}/main/{}/",
            self.as_str()
        )
    }

    /// Return the game's asset directory under `root`.
    #[must_use]
    pub fn directory(self, root: &Utf8Path) -> Utf8PathBuf {
        root.join(self.as_str())
    }

    /// Return the path of the rewritten manifest under `root`.
    #[must_use]
    pub fn manifest_path(self, root: &Utf8Path) -> Utf8PathBuf {
        self.directory(root).join(MANIFEST_FILENAME)
    }

    /// Return the path of the local update script under `root`.
    #[must_use]
    pub fn update_script_path(self, root: &Utf8Path) -> Utf8PathBuf {
        self.directory(root).join(UPDATE_SCRIPT_FILENAME)
    }
}

impl FromStr for Game {
    type Err = ManifestError;

    fn from_str(value: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|game| game.as_str() == value)
            .ok_or_else(|| ManifestError::InvalidGame {
                value: value.to_owned(),
                expected: Self::ALL.map(Self::as_str).join(", "),
            })
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
