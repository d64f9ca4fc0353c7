//! Defines the command-line arguments and subcommands for the `golden` tool.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "golden",
    version,
    about = "Maintain golden files and txtar directory snapshots."
)]
pub struct GoldenArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Remove every .golden file under a directory tree.
    Clean {
        /// The testdata directory to clean.
        #[arg(default_value = "testdata")]
        dir: PathBuf,
    },
    /// Print a directory tree as a txtar bundle.
    Snapshot {
        /// The directory to capture.
        #[arg(required = true)]
        dir: PathBuf,
    },
    /// Create the files of a txtar bundle under a directory.
    Init {
        /// The directory to populate.
        #[arg(required = true)]
        dir: PathBuf,
        /// The bundle file to read.
        #[arg(required = true)]
        bundle: PathBuf,
    },
    /// Merge txtar bundles and print the sorted result.
    Join {
        /// The bundle files to merge, in order.
        #[arg(required = true)]
        bundles: Vec<PathBuf>,
    },
    /// Show a line diff between a golden file and an output file.
    Diff {
        /// The expected (golden) file.
        #[arg(required = true)]
        want: PathBuf,
        /// The produced file.
        #[arg(required = true)]
        got: PathBuf,
        /// Disable colored output.
        #[arg(long)]
        no_color: bool,
    },
}
