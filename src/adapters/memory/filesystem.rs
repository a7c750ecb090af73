//! In-memory filesystem adapter.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use glob::{MatchOptions, Pattern};

use crate::ports::filesystem::{FileSystem, PortError};

/// Filesystem held entirely in memory, keyed by path as written.
///
/// Paths are compared lexically. A leading `./` is ignored so that
/// `./code/A.java` and `code/A.java` name the same file. Clones share the
/// same tree, so a test can keep a handle after boxing one into a context.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    files: Arc<Mutex<BTreeMap<PathBuf, String>>>,
}

impl MemoryFileSystem {
    /// Creates an empty filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a filesystem pre-populated with `(path, contents)` pairs.
    #[must_use]
    pub fn with_files<P: AsRef<Path>>(files: &[(P, &str)]) -> Self {
        let fs = Self::new();
        {
            let mut map = fs.lock();
            for (path, contents) in files {
                map.insert(normalize(path.as_ref()), (*contents).to_string());
            }
        }
        fs
    }

    /// Returns a copy of a file's contents, if present.
    #[must_use]
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        self.lock().get(&normalize(path.as_ref())).cloned()
    }

    /// Lists every stored path in sorted order.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.lock().keys().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<PathBuf, String>> {
        // A poisoned lock only means another test thread panicked mid-write.
        self.files.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

fn normalize(path: &Path) -> PathBuf {
    path.strip_prefix(".").unwrap_or(path).to_path_buf()
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String, PortError> {
        self.contents(path).ok_or_else(|| format!("File not found: {}", path.display()).into())
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), PortError> {
        self.lock().insert(normalize(path), contents.to_string());
        Ok(())
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<(), PortError> {
        let contents = self.read_to_string(from)?;
        self.write(to, &contents)
    }

    fn exists(&self, path: &Path) -> bool {
        let path = normalize(path);
        let files = self.lock();
        // Directories exist implicitly when any file lives under them.
        files.contains_key(&path) || files.keys().any(|k| k.starts_with(&path))
    }

    fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>, PortError> {
        let pattern = pattern.strip_prefix("./").unwrap_or(pattern);
        let pattern = Pattern::new(pattern)?;
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: true,
        };
        Ok(self.lock().keys().filter(|k| pattern.matches_path_with(k, options)).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glob_does_not_cross_directories() {
        let fs = MemoryFileSystem::with_files(&[
            ("../src/circuit/Layout.java", ""),
            ("../src/paper/sec3/Circuit.java", ""),
            ("../src/paper/Circuit.java", ""),
        ]);

        let shallow = fs.glob("../src/*/*.java").unwrap();
        assert_eq!(
            shallow,
            vec![PathBuf::from("../src/circuit/Layout.java"), PathBuf::from("../src/paper/Circuit.java")]
        );

        let deep = fs.glob("../src/*/*/*.java").unwrap();
        assert_eq!(deep, vec![PathBuf::from("../src/paper/sec3/Circuit.java")]);
    }

    #[test]
    fn leading_dot_slash_is_ignored() {
        let fs = MemoryFileSystem::with_files(&[("code/Snippet.scala", "x")]);
        assert_eq!(fs.glob("./code/*").unwrap(), vec![PathBuf::from("code/Snippet.scala")]);
        assert_eq!(fs.contents("./code/Snippet.scala").as_deref(), Some("x"));
    }

    #[test]
    fn glob_skips_dotfiles() {
        let fs = MemoryFileSystem::with_files(&[
            ("main.tex", ""),
            (".draft.tex", ""),
            ("sections/.x.tex", ""),
        ]);
        assert_eq!(fs.glob("*.tex").unwrap(), vec![PathBuf::from("main.tex")]);
        assert!(fs.glob("sections/*.tex").unwrap().is_empty());
        assert_eq!(fs.glob(".draft.tex").unwrap(), vec![PathBuf::from(".draft.tex")]);
    }

    #[test]
    fn copy_duplicates_contents() {
        let fs = MemoryFileSystem::with_files(&[("main.tex", "hello\n")]);
        fs.copy(Path::new("main.tex"), Path::new("main.tex-old")).unwrap();
        assert_eq!(fs.contents("main.tex-old").as_deref(), Some("hello\n"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let fs = MemoryFileSystem::new();
        assert!(fs.read_to_string(Path::new("nope.tex")).is_err());
        assert!(!fs.exists(Path::new("nope.tex")));
    }
}
