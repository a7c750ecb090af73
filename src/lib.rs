//! Core library entry for the `linecite` CLI.
//!
//! `linecite` scans source files for `BEGIN_<LABEL>` / `END_<LABEL>` marker
//! lines, then rewrites LaTeX documents whose lines carry `APPLY: <LABEL>`
//! so that their `linerange=` attribute and `{file}` argument point at the
//! labeled region.

pub mod adapters;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod label;
pub mod pipeline;
pub mod ports;
pub mod progress;
pub mod rewrite;
pub mod scan;

pub use error::Error;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        // --help and --version are reported through the error path but are not failures.
        Err(err) if !err.use_stderr() => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };
    commands::dispatch(&cli)
}
