//! Document rewriter.
//!
//! A document line carrying `APPLY: <label>` gets two substitutions, each on
//! the first match only:
//!
//! 1. `linerange=<anything>` becomes `linerange=<begin>-<end>`;
//! 2. the first `{...}` group not containing the directive becomes
//!    `{<source path>}`.
//!
//! All other lines pass through byte-for-byte, line endings included.

use std::borrow::Cow;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::{NoExpand, Regex};

use crate::context::ServiceContext;
use crate::error::Error;
use crate::label::LabelTable;
use crate::progress::Progress;

fn directive() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"APPLY:\s?(\w+)").expect("valid directive pattern"))
}

fn line_range_attr() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"linerange=[0-9-]*").expect("valid linerange pattern"))
}

fn brace_group() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{[^{]*\}").expect("valid brace group pattern"))
}

/// How a directive line was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// The label was found and the line rewritten.
    Resolved(String),
    /// The label is not in the table; the line was left alone.
    Unresolved(String),
}

/// Result of rewriting one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRewrite<'a> {
    /// The output line.
    pub text: Cow<'a, str>,
    /// The directive found on the line, if any.
    pub directive: Option<Directive>,
}

/// Rewrites a single document line against the label table.
#[must_use]
pub fn rewrite_line<'a>(line: &'a str, table: &LabelTable) -> LineRewrite<'a> {
    let Some(caps) = directive().captures(line) else {
        return LineRewrite { text: Cow::Borrowed(line), directive: None };
    };
    let label = caps[1].to_string();
    let Some(range) = table.get(&label) else {
        return LineRewrite { text: Cow::Borrowed(line), directive: Some(Directive::Unresolved(label)) };
    };

    let attr = format!("linerange={}", range.line_range());
    let with_range = line_range_attr().replacen(line, 1, NoExpand(&attr));
    let source = format!("{{{}}}", range.file.display());
    let text = replace_source_group(with_range, &source);

    LineRewrite { text, directive: Some(Directive::Resolved(label)) }
}

/// Replaces the first brace group that does not contain the directive.
fn replace_source_group<'a>(line: Cow<'a, str>, source: &str) -> Cow<'a, str> {
    // The range substitution may have shifted the directive, so locate it again.
    let Some(marker) = directive().find(&line).map(|m| m.range()) else {
        return line;
    };
    let target = brace_group()
        .find_iter(&line)
        .map(|group| group.range())
        .find(|group| group.end <= marker.start || group.start >= marker.end);
    let Some(group) = target else {
        return line;
    };

    let mut out = String::with_capacity(line.len() + source.len());
    out.push_str(&line[..group.start]);
    out.push_str(source);
    out.push_str(&line[group.end..]);
    Cow::Owned(out)
}

/// A rewritten document held in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewrittenText {
    /// The full rewritten content.
    pub text: String,
    /// Number of directives whose label was found.
    pub resolved: usize,
    /// Labels referenced but not found, in document order.
    pub unresolved: Vec<String>,
}

/// Rewrites every line of `text`, emitting `Processing` and `NotFound`
/// progress for each directive.
pub fn rewrite_text(
    text: &str,
    table: &LabelTable,
    on_progress: &mut dyn FnMut(Progress),
) -> RewrittenText {
    let mut out = RewrittenText { text: String::with_capacity(text.len()), ..Default::default() };
    for line in text.split_inclusive('\n') {
        let rewrite = rewrite_line(line, table);
        match rewrite.directive {
            Some(Directive::Resolved(label)) => {
                on_progress(Progress::Processing { label });
                out.resolved += 1;
            }
            Some(Directive::Unresolved(label)) => {
                on_progress(Progress::Processing { label: label.clone() });
                on_progress(Progress::NotFound { label: label.clone() });
                out.unresolved.push(label);
            }
            None => {}
        }
        out.text.push_str(&rewrite.text);
    }
    out
}

/// Options controlling how documents are written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOptions {
    /// Suffix appended to a document's path to name its backup.
    pub backup_suffix: String,
    /// When set, nothing is written to disk.
    pub dry_run: bool,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self { backup_suffix: crate::config::DEFAULT_BACKUP_SUFFIX.to_string(), dry_run: false }
    }
}

/// Outcome of rewriting one document file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentReport {
    /// The document path.
    pub path: PathBuf,
    /// Number of directives whose label was found.
    pub resolved: usize,
    /// Labels referenced but not found.
    pub unresolved: Vec<String>,
    /// Whether the rewritten content differs from the original.
    pub changed: bool,
    /// Where the original was copied, unless this was a dry run.
    pub backup: Option<PathBuf>,
}

/// Returns the backup path for `path`, e.g. `main.tex` → `main.tex-old`.
#[must_use]
pub fn backup_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Rewrites a document file in place, after copying it to its backup path.
///
/// The backup is always written before the document is overwritten, so a
/// failed overwrite never loses the original content.
///
/// # Errors
///
/// Returns [`Error::Io`] if the document cannot be read, backed up, or written.
pub fn rewrite_document(
    ctx: &ServiceContext,
    path: &Path,
    table: &LabelTable,
    options: &RewriteOptions,
    on_progress: &mut dyn FnMut(Progress),
) -> Result<DocumentReport, Error> {
    let original = ctx.fs.read_to_string(path).map_err(|e| Error::io("read", path, e))?;
    let rewritten = rewrite_text(&original, table, on_progress);
    let changed = rewritten.text != original;

    let backup = if options.dry_run {
        None
    } else {
        let backup = backup_path(path, &options.backup_suffix);
        ctx.fs.copy(path, &backup).map_err(|e| Error::io("back up", path, e))?;
        tracing::debug!(backup = %backup.display(), "wrote backup");
        ctx.fs.write(path, &rewritten.text).map_err(|e| Error::io("write", path, e))?;
        tracing::debug!(path = %path.display(), changed, "rewrote document");
        Some(backup)
    };

    Ok(DocumentReport {
        path: path.to_path_buf(),
        resolved: rewritten.resolved,
        unresolved: rewritten.unresolved,
        changed,
        backup,
    })
}
