//! Label table types.
//!
//! A label names a region of a source file delimited by `BEGIN_<name>` and
//! `END_<name>` marker lines. The region excludes the markers themselves:
//! `begin` is the line after the BEGIN marker and `end` the line before the
//! END marker.
//!
//! The table is assembled with [`LabelTableBuilder`] while scanning and
//! frozen into a [`LabelTable`] once every source file has been read.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Error;

/// Where a label is defined and which lines it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelRange {
    /// The source file that defines the label, as it was matched.
    pub file: PathBuf,
    /// First line of the region (1-based).
    pub begin: usize,
    /// Last line of the region (1-based).
    pub end: usize,
    /// The file holding the closing END marker, when it is not `file`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_file: Option<PathBuf>,
}

impl LabelRange {
    /// Formats the range as a `linerange=` value, e.g. `10-20`.
    #[must_use]
    pub fn line_range(&self) -> String {
        format!("{}-{}", self.begin, self.end)
    }
}

/// Read-only mapping from label name to its range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LabelTable {
    labels: BTreeMap<String, LabelRange>,
}

impl LabelTable {
    /// Looks up a label by name.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&LabelRange> {
        self.labels.get(label)
    }

    /// Number of labels in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns `true` if no labels were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterates labels in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LabelRange)> {
        self.labels.iter().map(|(name, range)| (name.as_str(), range))
    }
}

#[derive(Debug)]
struct PendingLabel {
    file: PathBuf,
    marker_line: usize,
    end: Option<(usize, PathBuf)>,
}

/// Accumulates label definitions across all scanned files.
///
/// The duplicate check spans every file fed to the same builder.
#[derive(Debug, Default)]
pub struct LabelTableBuilder {
    pending: BTreeMap<String, PendingLabel>,
}

impl LabelTableBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a `BEGIN_<label>` marker found on `marker_line` of `file`.
    ///
    /// Returns the first line of the region.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateLabel`] if the label was already opened,
    /// in this file or any earlier one.
    pub fn open(&mut self, label: &str, file: &Path, marker_line: usize) -> Result<usize, Error> {
        if let Some(existing) = self.pending.get(label) {
            return Err(Error::DuplicateLabel {
                label: label.to_string(),
                file: file.to_path_buf(),
                first: existing.file.clone(),
            });
        }
        self.pending.insert(
            label.to_string(),
            PendingLabel { file: file.to_path_buf(), marker_line, end: None },
        );
        Ok(marker_line + 1)
    }

    /// Records an `END_<label>` marker found on `marker_line` of `file`.
    ///
    /// The most recent END wins: a later END for the same label, in this
    /// file or a later one, overwrites the recorded end line.
    ///
    /// Returns the last line of the region.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnmatchedEnd`] if no BEGIN has been seen for the label.
    pub fn close(&mut self, label: &str, file: &Path, marker_line: usize) -> Result<usize, Error> {
        let Some(entry) = self.pending.get_mut(label) else {
            return Err(Error::UnmatchedEnd {
                label: label.to_string(),
                file: file.to_path_buf(),
                line: marker_line,
            });
        };
        if entry.end.is_some() {
            tracing::warn!(
                label,
                file = %file.display(),
                line = marker_line,
                "END marker overrides an earlier END"
            );
        }
        let end = marker_line.saturating_sub(1);
        entry.end = Some((end, file.to_path_buf()));
        Ok(end)
    }

    /// Freezes the builder into a table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnterminatedLabel`] for the first label (by name)
    /// that was opened but never closed.
    pub fn finish(self) -> Result<LabelTable, Error> {
        let mut labels = BTreeMap::new();
        for (name, pending) in self.pending {
            let Some((end, end_file)) = pending.end else {
                return Err(Error::UnterminatedLabel {
                    label: name,
                    file: pending.file,
                    line: pending.marker_line,
                });
            };
            let end_file = (end_file != pending.file).then_some(end_file);
            let range =
                LabelRange { file: pending.file, begin: pending.marker_line + 1, end, end_file };
            labels.insert(name, range);
        }
        Ok(LabelTable { labels })
    }
}
