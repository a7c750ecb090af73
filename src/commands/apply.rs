//! `linecite apply` command.

use crate::config::Config;
use crate::context::ServiceContext;
use crate::pipeline::{self, RunSummary};
use crate::progress::Progress;

/// Execute the `apply` command.
///
/// Prints one progress line per marker and directive, then a summary.
///
/// # Errors
///
/// Returns an error string if scanning or rewriting fails. A scan failure
/// leaves every document untouched.
pub fn run(ctx: &ServiceContext, config: &Config, dry_run: bool) -> Result<(), String> {
    let mut print = |event: Progress| println!("{event}");
    let summary = pipeline::apply(ctx, config, dry_run, &mut print).map_err(|e| e.to_string())?;
    println!("{}", format_summary(&summary, dry_run));
    Ok(())
}

fn format_summary(summary: &RunSummary, dry_run: bool) -> String {
    let documents = summary.documents.len();
    let unresolved = summary.unresolved();
    if dry_run {
        format!(
            "Dry run: {} of {documents} document(s) would change; {unresolved} unresolved reference(s)",
            summary.changed()
        )
    } else {
        format!(
            "Rewrote {documents} document(s) using {} label(s); {unresolved} unresolved reference(s)",
            summary.labels
        )
    }
}
