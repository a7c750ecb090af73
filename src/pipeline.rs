//! Two-pass orchestration: scan every source file, then rewrite documents.
//!
//! The label table is complete before the first document is read. Any scan
//! error therefore stops the run with every document untouched.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::context::ServiceContext;
use crate::error::Error;
use crate::label::{LabelTable, LabelTableBuilder};
use crate::progress::Progress;
use crate::rewrite::{rewrite_document, DocumentReport, RewriteOptions};
use crate::scan::scan_file;

/// Summary of a full scan-and-rewrite run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of labels found in the sources.
    pub labels: usize,
    /// One report per processed document, in processing order.
    pub documents: Vec<DocumentReport>,
}

impl RunSummary {
    /// Total number of directives that named an unknown label.
    #[must_use]
    pub fn unresolved(&self) -> usize {
        self.documents.iter().map(|d| d.unresolved.len()).sum()
    }

    /// Number of documents whose content changed.
    #[must_use]
    pub fn changed(&self) -> usize {
        self.documents.iter().filter(|d| d.changed).count()
    }
}

/// Expands patterns in order, keeping each file at its first position.
///
/// Paths keep the spelling of the pattern that produced them, so
/// `./code/*` yields `./code/A.java`. Two spellings of one file count as
/// the same file.
///
/// # Errors
///
/// Returns [`Error::Pattern`] if a pattern cannot be expanded.
pub fn expand_patterns(ctx: &ServiceContext, patterns: &[String]) -> Result<Vec<PathBuf>, Error> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();
    for pattern in patterns {
        let matched = ctx
            .fs
            .glob(pattern)
            .map_err(|e| Error::Pattern { pattern: pattern.clone(), message: e.to_string() })?;
        tracing::debug!(pattern = %pattern, count = matched.len(), "expanded pattern");
        let dot_relative = pattern.starts_with("./");
        for path in matched {
            let key = path.strip_prefix(".").map(Path::to_path_buf).unwrap_or_else(|_| path.clone());
            if !seen.insert(key) {
                continue;
            }
            // The glob walker drops a leading `./`; put it back.
            if dot_relative && !path.starts_with(".") {
                files.push(Path::new(".").join(path));
            } else {
                files.push(path);
            }
        }
    }
    Ok(files)
}

/// Scans every configured source file and returns the finished label table.
///
/// # Errors
///
/// Returns the first scan, pattern, or I/O error encountered.
pub fn collect_labels(
    ctx: &ServiceContext,
    config: &Config,
    on_progress: &mut dyn FnMut(Progress),
) -> Result<LabelTable, Error> {
    let mut labels = LabelTableBuilder::new();
    for path in expand_patterns(ctx, &config.sources)? {
        scan_file(ctx, &path, &mut labels, on_progress)?;
    }
    labels.finish()
}

/// Runs the full pipeline: build the label table, then rewrite every
/// configured document against it.
///
/// # Errors
///
/// Returns the first fatal error. A scan error is returned before any
/// document is read.
pub fn apply(
    ctx: &ServiceContext,
    config: &Config,
    dry_run: bool,
    on_progress: &mut dyn FnMut(Progress),
) -> Result<RunSummary, Error> {
    let table = collect_labels(ctx, config, on_progress)?;
    let options = RewriteOptions { backup_suffix: config.backup_suffix.clone(), dry_run };

    let mut documents = Vec::new();
    for path in expand_patterns(ctx, &config.documents)? {
        documents.push(rewrite_document(ctx, &path, &table, &options, on_progress)?);
    }
    Ok(RunSummary { labels: table.len(), documents })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryFileSystem;
    use crate::ports::FileSystem;

    const CIRCUIT: &str = "package paper;\n\
        //BEGIN_INIT\n\
        class Circuit {\n\
        }\n\
        //END_INIT\n\
        //BEGIN_SYNTAX\n\
        interface Syntax {}\n\
        //END_SYNTAX\n";

    const LAYOUT: &str = "package circuit;\n\n//BEGIN_LAYOUT\nclass Layout {}\n//END_LAYOUT\n";

    const MAIN_TEX: &str = "\\section{Intro}\n\
        \\lstinputlisting[linerange=1-1]{x.java} % APPLY: INIT\n\
        \\lstinputlisting[linerange=1-1]{x.java} % APPLY: MISSING\n";

    const SECTION_TEX: &str = "\\lstinputlisting[firstnumber=1,linerange=]{} %APPLY:LAYOUT\n";

    fn fixture() -> MemoryFileSystem {
        MemoryFileSystem::with_files(&[
            ("../src/paper/Circuit.java", CIRCUIT),
            ("../src/circuit/deep/Layout.scala", LAYOUT),
            ("main.tex", MAIN_TEX),
            ("sections/layout.tex", SECTION_TEX),
        ])
    }

    fn run(fs: &MemoryFileSystem, dry_run: bool) -> (Result<RunSummary, Error>, Vec<Progress>) {
        let ctx = ServiceContext::in_memory(fs.clone());
        let mut events = Vec::new();
        let mut record = |p: Progress| events.push(p);
        let result = apply(&ctx, &Config::default(), dry_run, &mut record);
        (result, events)
    }

    #[test]
    fn rewrites_documents_and_keeps_backups() {
        let fs = fixture();
        let (result, events) = run(&fs, false);
        let summary = result.unwrap();

        assert_eq!(summary.labels, 3);
        assert_eq!(summary.documents.len(), 2);
        assert_eq!(summary.unresolved(), 1);
        assert_eq!(summary.changed(), 2);

        assert_eq!(
            fs.contents("main.tex").unwrap(),
            "\\section{Intro}\n\
             \\lstinputlisting[linerange=3-4]{../src/paper/Circuit.java} % APPLY: INIT\n\
             \\lstinputlisting[linerange=1-1]{x.java} % APPLY: MISSING\n"
        );
        assert_eq!(
            fs.contents("sections/layout.tex").unwrap(),
            "\\lstinputlisting[firstnumber=1,linerange=4-4]{../src/circuit/deep/Layout.scala} %APPLY:LAYOUT\n"
        );
        assert_eq!(fs.contents("main.tex-old").unwrap(), MAIN_TEX);
        assert_eq!(fs.contents("sections/layout.tex-old").unwrap(), SECTION_TEX);

        assert!(events.contains(&Progress::Begin { label: "INIT".to_string(), line: 3 }));
        assert!(events.contains(&Progress::NotFound { label: "MISSING".to_string() }));
    }

    #[test]
    fn duplicate_label_aborts_before_rewriting() {
        let fs = fixture();
        fs.write(Path::new("code/Copy.java"), "//BEGIN_INIT\nx\n//END_INIT\n").unwrap();

        let (result, events) = run(&fs, false);
        assert!(matches!(result, Err(Error::DuplicateLabel { ref label, .. }) if label == "INIT"));
        assert_eq!(fs.contents("main.tex").unwrap(), MAIN_TEX);
        assert!(fs.contents("main.tex-old").is_none());
        assert!(!events.iter().any(|e| matches!(e, Progress::Processing { .. })));
    }

    #[test]
    fn second_run_reproduces_the_same_ranges() {
        let fs = fixture();
        run(&fs, false).0.unwrap();
        let first = fs.contents("main.tex").unwrap();

        run(&fs, false).0.unwrap();
        assert_eq!(fs.contents("main.tex").unwrap(), first);
        // The backup now holds the first run's output.
        assert_eq!(fs.contents("main.tex-old").unwrap(), first);
    }

    #[test]
    fn dry_run_leaves_tree_untouched() {
        let fs = fixture();
        let before = fs.paths();
        let (result, _) = run(&fs, true);
        let summary = result.unwrap();

        assert_eq!(summary.changed(), 2);
        assert_eq!(fs.paths(), before);
        assert_eq!(fs.contents("main.tex").unwrap(), MAIN_TEX);
    }

    #[test]
    fn overlapping_patterns_visit_files_once() {
        let fs = MemoryFileSystem::with_files(&[("a.tex", ""), ("b.tex", "")]);
        let ctx = ServiceContext::in_memory(fs);
        let patterns = vec!["b.tex".to_string(), "*.tex".to_string()];
        let files = expand_patterns(&ctx, &patterns).unwrap();
        assert_eq!(files, vec![Path::new("b.tex"), Path::new("a.tex")]);
    }

    #[test]
    fn dot_relative_patterns_keep_their_spelling() {
        let fs = MemoryFileSystem::with_files(&[("code/A.java", ""), ("code/B.java", "")]);
        let ctx = ServiceContext::in_memory(fs);
        let patterns = vec!["./code/*".to_string(), "code/B.java".to_string()];
        let files = expand_patterns(&ctx, &patterns).unwrap();
        assert_eq!(files, vec![Path::new("./code/A.java"), Path::new("./code/B.java")]);
    }

    #[test]
    fn dot_relative_source_path_reaches_the_document() {
        let fs = MemoryFileSystem::with_files(&[
            ("code/Snippet.java", "//BEGIN_SNIP\nx\n//END_SNIP\n"),
            ("main.tex", "\\lstinputlisting[linerange=]{} % APPLY: SNIP\n"),
        ]);
        run(&fs, false).0.unwrap();
        assert_eq!(
            fs.contents("main.tex").unwrap(),
            "\\lstinputlisting[linerange=2-2]{./code/Snippet.java} % APPLY: SNIP\n"
        );
    }

    #[test]
    fn bad_pattern_is_reported() {
        let ctx = ServiceContext::in_memory(MemoryFileSystem::new());
        let err = expand_patterns(&ctx, &["[".to_string()]).unwrap_err();
        assert!(matches!(err, Error::Pattern { .. }));
    }
}
