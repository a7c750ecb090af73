//! Configuration: which files to scan and rewrite, and how to name backups.
//!
//! Settings come from an optional YAML file. Every key is optional; missing
//! keys keep the built-in defaults, which reproduce the fixed layout of a
//! paper directory sitting next to a `src` tree:
//!
//! ```yaml
//! sources:
//!   - ../src/*/*.java
//!   - ../src/*/*.scala
//!   - ../src/*/*/*.java
//!   - ../src/*/*/*.scala
//!   - ./code/*
//! documents:
//!   - "*.tex"
//!   - ./sections/*.tex
//! backup_suffix: -old
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::context::ServiceContext;
use crate::error::Error;

/// Config file looked up in the working directory when none is named.
pub const CONFIG_FILE: &str = "linecite.yaml";

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "LINECITE_CONFIG";

/// Suffix appended to a document path to name its backup.
pub const DEFAULT_BACKUP_SUFFIX: &str = "-old";

const DEFAULT_SOURCES: &[&str] =
    &["../src/*/*.java", "../src/*/*.scala", "../src/*/*/*.java", "../src/*/*/*.scala", "./code/*"];

const DEFAULT_DOCUMENTS: &[&str] = &["*.tex", "./sections/*.tex"];

/// File selection and backup settings for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Glob patterns for source files, scanned in order.
    pub sources: Vec<String>,
    /// Glob patterns for document files, rewritten in order.
    pub documents: Vec<String>,
    /// Suffix for backup copies of rewritten documents.
    pub backup_suffix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: DEFAULT_SOURCES.iter().map(ToString::to_string).collect(),
            documents: DEFAULT_DOCUMENTS.iter().map(ToString::to_string).collect(),
            backup_suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
        }
    }
}

impl Config {
    /// Parses YAML config text. `path` is only used in error messages.
    ///
    /// An empty file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the YAML is malformed, has unknown keys,
    /// or sets an empty backup suffix.
    pub fn parse(path: &Path, text: &str) -> Result<Self, Error> {
        let config = if text.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(text)
                .map_err(|e| Error::Config { path: path.to_path_buf(), message: e.to_string() })?
        };
        config.validate(path)?;
        Ok(config)
    }

    /// Loads the configuration for a run.
    ///
    /// An `explicit` path must exist. Without one, `linecite.yaml` in the
    /// working directory is used when present, otherwise the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the explicit file is missing or any
    /// config file is invalid, and [`Error::Io`] if it cannot be read.
    pub fn load(ctx: &ServiceContext, explicit: Option<&Path>) -> Result<Self, Error> {
        let path = match explicit {
            Some(path) if !ctx.fs.exists(path) => {
                return Err(Error::Config {
                    path: path.to_path_buf(),
                    message: "file not found".to_string(),
                });
            }
            Some(path) => path.to_path_buf(),
            None => {
                let implicit = PathBuf::from(CONFIG_FILE);
                if !ctx.fs.exists(&implicit) {
                    tracing::debug!("no config file, using defaults");
                    return Ok(Self::default());
                }
                implicit
            }
        };

        tracing::debug!(path = %path.display(), "loading config");
        let text = ctx.fs.read_to_string(&path).map_err(|e| Error::io("read", &path, e))?;
        Self::parse(&path, &text)
    }

    fn validate(&self, path: &Path) -> Result<(), Error> {
        if self.backup_suffix.is_empty() {
            return Err(Error::Config {
                path: path.to_path_buf(),
                message: "backup_suffix must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
