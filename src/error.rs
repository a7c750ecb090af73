//! Error taxonomy for scanning and rewriting.
//!
//! Every variant is fatal: the run stops at the first one. Unresolved
//! `APPLY:` references are not errors and are reported as progress instead.

use std::path::PathBuf;

/// Fatal failures raised while building the label table or rewriting documents.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A `BEGIN_<label>` marker was seen for a label that is already defined.
    #[error("Symbol '{label}' already defined {} (first defined in {})", .file.display(), .first.display())]
    DuplicateLabel {
        /// The label name.
        label: String,
        /// The file containing the second definition.
        file: PathBuf,
        /// The file that defined the label first.
        first: PathBuf,
    },

    /// An `END_<label>` marker appeared before any `BEGIN_<label>`.
    #[error("END_{label} at {}:{line} has no matching BEGIN_{label}", .file.display())]
    UnmatchedEnd {
        /// The label name.
        label: String,
        /// The file containing the marker.
        file: PathBuf,
        /// 1-based line number of the marker.
        line: usize,
    },

    /// A `BEGIN_<label>` marker was never closed.
    #[error("BEGIN_{label} at {}:{line} is never closed by END_{label}", .file.display())]
    UnterminatedLabel {
        /// The label name.
        label: String,
        /// The file containing the marker.
        file: PathBuf,
        /// 1-based line number of the marker.
        line: usize,
    },

    /// A file-selection pattern could not be compiled.
    #[error("invalid file pattern '{pattern}': {message}")]
    Pattern {
        /// The offending pattern.
        pattern: String,
        /// Parser message.
        message: String,
    },

    /// A filesystem operation failed.
    #[error("failed to {action} {}: {message}", .path.display())]
    Io {
        /// What was being attempted ("read", "write", "back up").
        action: &'static str,
        /// The path involved.
        path: PathBuf,
        /// Underlying error message.
        message: String,
    },

    /// The configuration file is missing, unparsable, or invalid.
    #[error("invalid config {}: {message}", .path.display())]
    Config {
        /// The configuration file path.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },
}

impl Error {
    pub(crate) fn io(
        action: &'static str,
        path: impl Into<PathBuf>,
        err: impl std::fmt::Display,
    ) -> Self {
        Self::Io { action, path: path.into(), message: err.to_string() }
    }
}
