//! Progress events emitted while scanning and rewriting.
//!
//! Events are informational only. The CLI prints them to stdout; tests
//! collect them to assert on what was seen.

use std::fmt;

/// A single progress event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// A `BEGIN_<label>` marker; `line` is the first line of the region.
    Begin {
        /// The label name.
        label: String,
        /// First line of the region.
        line: usize,
    },
    /// An `END_<label>` marker; `line` is the last line of the region.
    End {
        /// The label name.
        label: String,
        /// Last line of the region.
        line: usize,
    },
    /// A document line carrying an `APPLY:` directive.
    Processing {
        /// The referenced label.
        label: String,
    },
    /// The directive just reported by `Processing` names an unknown label.
    NotFound {
        /// The referenced label.
        label: String,
    },
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Begin { label, line } => write!(f, "BEGIN {label}: {line}"),
            Self::End { label, line } => write!(f, "END {label}: {line}"),
            Self::Processing { label } => write!(f, "Processing {label}"),
            Self::NotFound { .. } => f.write_str("Not found!"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Progress;

    #[test]
    fn display_matches_console_format() {
        let begin = Progress::Begin { label: "INIT".to_string(), line: 11 };
        let end = Progress::End { label: "INIT".to_string(), line: 26 };
        let processing = Progress::Processing { label: "INIT".to_string() };
        let missing = Progress::NotFound { label: "NOPE".to_string() };

        assert_eq!(begin.to_string(), "BEGIN INIT: 11");
        assert_eq!(end.to_string(), "END INIT: 26");
        assert_eq!(processing.to_string(), "Processing INIT");
        assert_eq!(missing.to_string(), "Not found!");
    }
}
