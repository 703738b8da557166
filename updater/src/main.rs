//! `update-manifest` CLI entrypoint.
//!
//! Rewrites `<game>/manifest.xml` in the current directory from the official
//! upstream manifest and reports progress on standard error.

use camino::Utf8PathBuf;
use clap::Parser;
use pob_manifest_updater::cli::Cli;
use pob_manifest_updater::error::{ManifestError, Result};
use pob_manifest_updater::fetch::HttpFetcher;
use pob_manifest_updater::output::write_stderr_line;
use pob_manifest_updater::pipeline::update_manifest;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stderr: &mut dyn Write) -> Result<()> {
    let cwd = std::env::current_dir().map_err(|e| ManifestError::WorkingDirectory {
        reason: e.to_string(),
    })?;
    let root = Utf8PathBuf::try_from(cwd).map_err(|e| ManifestError::WorkingDirectory {
        reason: format!("current directory is not valid UTF-8: {e}"),
    })?;

    let outcome = update_manifest(&HttpFetcher, cli.game, &root, stderr)?;
    write_stderr_line(stderr, outcome.summary);
    Ok(())
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("error: {}", error_chain(&err)));
            1
        }
    }
}

/// Render `err` followed by each of its sources, separated by `: `.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
