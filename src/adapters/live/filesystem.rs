//! Live filesystem adapter using `std::fs` and the `glob` crate.

use std::path::{Path, PathBuf};

use glob::MatchOptions;

use crate::ports::filesystem::{FileSystem, PortError};

/// Live filesystem adapter backed by real disk I/O.
pub struct LiveFileSystem;

impl FileSystem for LiveFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String, PortError> {
        Ok(std::fs::read_to_string(path)?)
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), PortError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Ok(std::fs::write(path, contents)?)
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<(), PortError> {
        std::fs::copy(from, to)?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>, PortError> {
        // Wildcards skip dotfiles, as shell globbing does.
        let options = MatchOptions { require_literal_leading_dot: true, ..MatchOptions::new() };
        let mut files = Vec::new();
        for entry in glob::glob_with(pattern, options)? {
            let path = entry?;
            if path.is_file() {
                files.push(path);
            }
        }
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glob_returns_sorted_files_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("code")).unwrap();
        std::fs::create_dir(dir.path().join("code/nested")).unwrap();
        std::fs::write(dir.path().join("code/b.scala"), "b").unwrap();
        std::fs::write(dir.path().join("code/a.java"), "a").unwrap();

        let pattern = format!("{}/code/*", dir.path().display());
        let files = LiveFileSystem.glob(&pattern).unwrap();
        assert_eq!(files, vec![dir.path().join("code/a.java"), dir.path().join("code/b.scala")]);
    }

    #[test]
    fn glob_skips_dotfiles() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("main.tex"), "").unwrap();
        std::fs::write(dir.path().join(".draft.tex"), "").unwrap();

        let files = LiveFileSystem.glob(&format!("{}/*.tex", dir.path().display())).unwrap();
        assert_eq!(files, vec![dir.path().join("main.tex")]);
    }

    #[test]
    fn copy_then_write_keeps_backup() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("main.tex");
        let backup = dir.path().join("main.tex-old");
        std::fs::write(&doc, "before\n").unwrap();

        LiveFileSystem.copy(&doc, &backup).unwrap();
        LiveFileSystem.write(&doc, "after\n").unwrap();

        assert_eq!(LiveFileSystem.read_to_string(&backup).unwrap(), "before\n");
        assert_eq!(LiveFileSystem.read_to_string(&doc).unwrap(), "after\n");
    }

    #[test]
    fn malformed_pattern_is_an_error() {
        assert!(LiveFileSystem.glob("[").is_err());
    }
}
