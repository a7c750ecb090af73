//! `linecite labels` command.

use crate::config::Config;
use crate::context::ServiceContext;
use crate::label::LabelTable;
use crate::pipeline;
use crate::progress::Progress;

/// Execute the `labels` command.
///
/// Scans every source file and prints the resulting table, either as an
/// aligned text table or as JSON. Nothing is rewritten.
///
/// # Errors
///
/// Returns an error string if scanning fails or JSON encoding fails.
pub fn run(ctx: &ServiceContext, config: &Config, json: bool) -> Result<(), String> {
    let table =
        pipeline::collect_labels(ctx, config, &mut |_: Progress| {}).map_err(|e| e.to_string())?;
    if json {
        let out = serde_json::to_string_pretty(&table)
            .map_err(|e| format!("Failed to encode label table: {e}"))?;
        println!("{out}");
    } else if table.is_empty() {
        println!("No labels found.");
    } else {
        print!("{}", format_table(&table));
    }
    Ok(())
}

fn format_table(table: &LabelTable) -> String {
    let rows: Vec<(&str, String, String)> = table
        .iter()
        .map(|(name, range)| (name, range.line_range(), range.file.display().to_string()))
        .collect();

    let label_width = rows.iter().map(|r| r.0.len()).max().unwrap_or(5).max(5);
    let lines_width = rows.iter().map(|r| r.1.len()).max().unwrap_or(5).max(5);

    let mut out = format!("{:<label_width$}  {:<lines_width$}  FILE\n", "LABEL", "LINES");
    out.push_str(&format!("{:-<label_width$}  {:-<lines_width$}  ----\n", "", ""));
    for (name, lines, file) in rows {
        out.push_str(&format!("{name:<label_width$}  {lines:<lines_width$}  {file}\n"));
    }
    out
}
