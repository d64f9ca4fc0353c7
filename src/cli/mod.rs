//! The `golden` Command-Line Interface.
//!
//! Thin wrappers over the file-tree and archive utilities, for maintaining
//! testdata directories outside of a test run.

use std::fs;
use std::path::Path;

use clap::Parser;
use miette::Report;
use tracing::debug;

use crate::cli::args::{Command, GoldenArgs};
use crate::errors::{GoldenError, GoldenResult, IoOp};
use crate::{archive, report, tree};

pub mod args;
pub mod output;

/// Process exit status for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Differs,
}

/// The main entry point for the CLI. Returns the process exit code.
pub fn run() -> i32 {
    let args = GoldenArgs::parse();
    debug!(command = ?args.command, "running");

    match dispatch(args.command) {
        Ok(Outcome::Success) => 0,
        Ok(Outcome::Differs) => 1,
        Err(e) => {
            eprintln!("{:?}", Report::new(e));
            2
        }
    }
}

fn dispatch(command: Command) -> GoldenResult<Outcome> {
    match command {
        Command::Clean { dir } => {
            let removed = tree::remove_all(&dir)?;
            println!("removed {removed} golden file(s) under {}", dir.display());
        }
        Command::Snapshot { dir } => {
            let bundle = tree::snapshot_dir(&dir)?;
            write_stdout(&bundle)?;
        }
        Command::Init { dir, bundle } => {
            let text = read_text(&bundle)?;
            tree::dir_init(&dir, &text)?;
        }
        Command::Join { bundles } => {
            let texts = bundles
                .iter()
                .map(|path| read_text(path))
                .collect::<GoldenResult<Vec<_>>>()?;
            write_stdout(&archive::join(&texts)?)?;
        }
        Command::Diff {
            want,
            got,
            no_color,
        } => return handle_diff(&want, &got, no_color),
    }
    Ok(Outcome::Success)
}

/// Handles the `diff` subcommand.
fn handle_diff(want: &Path, got: &Path, no_color: bool) -> GoldenResult<Outcome> {
    let want_bytes = fs::read(want).map_err(|e| GoldenError::io(IoOp::Read, want, e))?;
    let got_bytes = fs::read(got).map_err(|e| GoldenError::io(IoOp::Read, got, e))?;

    let diff = report::text_diff(&want_bytes, &got_bytes);
    if diff.is_equal() {
        return Ok(Outcome::Success);
    }
    output::print_diff(&diff, output::color_choice(no_color))
        .map_err(|e| GoldenError::io(IoOp::Write, "<stdout>", e))?;
    Ok(Outcome::Differs)
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn read_text(path: &Path) -> GoldenResult<String> {
    let bytes = fs::read(path).map_err(|e| GoldenError::io(IoOp::Read, path, e))?;
    String::from_utf8(bytes).map_err(|_| GoldenError::NonUtf8 {
        what: path.display().to_string(),
    })
}

fn write_stdout(text: &str) -> GoldenResult<()> {
    output::print_text(text).map_err(|e| GoldenError::io(IoOp::Write, "<stdout>", e))
}
