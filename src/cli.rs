//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `linecite`.
#[derive(Debug, Parser)]
#[command(
    name = "linecite",
    version,
    about = "Sync LaTeX listing line ranges with BEGIN_/END_ markers in source files"
)]
pub struct Cli {
    /// Config file [default: $LINECITE_CONFIG, then ./linecite.yaml].
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Run as if started in DIR.
    #[arg(short = 'C', long = "dir", global = true, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// The command to execute; defaults to `apply`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Supported subcommands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Scan sources, then rewrite every document in place (keeping backups).
    Apply {
        /// Report what would change without writing anything.
        #[arg(long)]
        dry_run: bool,
    },
    /// Scan sources and print the label table.
    Labels {
        /// Print the table as JSON.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// The command to run, falling back to a plain `apply`.
    #[must_use]
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Apply { dry_run: false })
    }
}
