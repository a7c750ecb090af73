//! Label scanner.
//!
//! Reads source files line by line and feeds every `BEGIN_<name>` /
//! `END_<name>` marker into a shared [`LabelTableBuilder`].

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::context::ServiceContext;
use crate::error::Error;
use crate::label::LabelTableBuilder;
use crate::progress::Progress;

fn begin_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\bBEGIN_(\w+)").expect("valid BEGIN marker pattern"))
}

fn end_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\bEND_(\w+)").expect("valid END marker pattern"))
}

/// Scans the text of one source file.
///
/// `file` is recorded as the defining path of every label opened here.
/// On a line carrying both markers the BEGIN is handled first.
///
/// # Errors
///
/// Stops at the first duplicate BEGIN or an END seen before its BEGIN; see
/// [`LabelTableBuilder::open`] and [`LabelTableBuilder::close`].
pub fn scan_source(
    text: &str,
    file: &Path,
    labels: &mut LabelTableBuilder,
    on_progress: &mut dyn FnMut(Progress),
) -> Result<(), Error> {
    for (index, line) in text.lines().enumerate() {
        let counter = index + 1;
        if let Some(caps) = begin_marker().captures(line) {
            let label = &caps[1];
            let begin = labels.open(label, file, counter)?;
            on_progress(Progress::Begin { label: label.to_string(), line: begin });
        }
        if let Some(caps) = end_marker().captures(line) {
            let label = &caps[1];
            let end = labels.close(label, file, counter)?;
            on_progress(Progress::End { label: label.to_string(), line: end });
        }
    }
    Ok(())
}

/// Reads `path` through the context's filesystem and scans it.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read, or any error from
/// [`scan_source`].
pub fn scan_file(
    ctx: &ServiceContext,
    path: &Path,
    labels: &mut LabelTableBuilder,
    on_progress: &mut dyn FnMut(Progress),
) -> Result<(), Error> {
    tracing::debug!(path = %path.display(), "scanning source file");
    let text = ctx.fs.read_to_string(path).map_err(|e| Error::io("read", path, e))?;
    scan_source(&text, path, labels, on_progress)
}
