//! Filesystem port for file I/O operations.

use std::path::{Path, PathBuf};

/// Boxed error returned by port operations.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;

/// Provides filesystem access for scanning sources and rewriting documents.
///
/// Abstracting the filesystem lets the whole pipeline run against an
/// in-memory tree in tests without touching the real disk.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or is not valid UTF-8.
    fn read_to_string(&self, path: &Path) -> Result<String, PortError>;

    /// Writes the given contents to a file, creating or overwriting it.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails (permissions, disk full, etc.).
    fn write(&self, path: &Path, contents: &str) -> Result<(), PortError>;

    /// Copies `from` to `to` verbatim, overwriting `to` if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if `from` cannot be read or `to` cannot be written.
    fn copy(&self, from: &Path, to: &Path) -> Result<(), PortError>;

    /// Returns `true` if the path exists on the filesystem.
    fn exists(&self, path: &Path) -> bool;

    /// Expands a glob pattern into the regular files it matches, in sorted
    /// order. Paths are returned in the form the pattern spells them, so a
    /// relative pattern yields relative paths.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is malformed or a directory cannot be read.
    fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>, PortError>;
}
