//! Command-line interface for the manifest updater.

use crate::game::Game;
use clap::Parser;

/// Rewrite the Path of Building update manifest for this repository.
#[derive(Parser, Debug)]
#[command(name = "update-manifest")]
#[command(version, about)]
#[command(long_about = concat!(
    "Rewrite the Path of Building update manifest for this repository.\n\n",
    "Downloads the official manifest for the selected game, pins it to the ",
    "master branch on any platform, makes this repository the default source, ",
    "drops Windows runtime binaries, fonts, and archives, and points ",
    "UpdateCheck.lua at the modified copy in the game directory.\n\n",
    "The result is written to <game>/manifest.xml in the current directory.",
))]
pub struct Cli {
    /// Game whose manifest should be rewritten.
    #[arg(long, value_enum, value_name = "GAME")]
    pub game: Game,
}
