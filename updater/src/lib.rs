//! Path of Building manifest updater library.
//!
//! Fetches the official Path of Building `manifest.xml` for one game and
//! rewrites it so that this repository becomes the default update source.
//! It is used by the `update-manifest` binary and can be driven
//! programmatically with a custom [`fetch::ManifestFetcher`] for testing.
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions
//! - [`digest`] - SHA-1 digest of the substituted update script
//! - [`document`] - XML element tree with parse and serialize
//! - [`error`] - Error types for the update run
//! - [`fetch`] - Upstream manifest retrieval
//! - [`game`] - Game selector and the URLs and paths derived from it
//! - [`output`] - Atomic manifest writes and progress lines
//! - [`pipeline`] - Fetch, rewrite, and write in one call
//! - [`rules`] - Manifest rewrite rules

pub mod cli;
pub mod digest;
pub mod document;
pub mod error;
pub mod fetch;
pub mod game;
pub mod output;
pub mod pipeline;
pub mod rules;
