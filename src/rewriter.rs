//! The directory rewriter: renames matching files and rewrites their contents.

use crate::diff::DiffSummary;
use crate::error::{RewriteError, Result};
use crate::matcher::FileMatcher;
use crate::rule::RewriteRule;
use crate::transform::{FileChange, RenameOperation, RenameSkip, TextTransform};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What happened to a file's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentOutcome {
    /// The file was written back with substitutions applied.
    Rewritten { summary: DiffSummary },
    /// The file was written back byte-for-byte unchanged.
    Unchanged,
    /// Reading, decoding, or writing failed.
    Failed,
}

/// The record of one file visited during a traversal.
#[derive(Debug)]
pub struct FileOutcome {
    /// The path the walk found.
    pub path: PathBuf,
    /// The new path, if the rename took effect.
    pub renamed_to: Option<PathBuf>,
    pub content: ContentOutcome,
    /// Failures of the rename and content steps, in that order.
    pub errors: Vec<RewriteError>,
}

impl FileOutcome {
    /// The path of the file after processing.
    pub fn final_path(&self) -> &Path {
        self.renamed_to.as_deref().unwrap_or(&self.path)
    }

    /// Returns true if the content was changed on disk.
    pub fn is_modified(&self) -> bool {
        matches!(self.content, ContentOutcome::Rewritten { .. })
    }
}

/// The result of a traversal.
#[derive(Debug, Default)]
pub struct RewriteReport {
    pub outcomes: Vec<FileOutcome>,
    /// Entries the walk could not read.
    pub walk_errors: Vec<RewriteError>,
}

impl RewriteReport {
    pub fn files_visited(&self) -> usize {
        self.outcomes.len()
    }

    pub fn files_renamed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.renamed_to.is_some())
            .count()
    }

    pub fn files_modified(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_modified()).count()
    }

    /// All failures recorded, walk errors first.
    pub fn failures(&self) -> impl Iterator<Item = &RewriteError> {
        self.walk_errors
            .iter()
            .chain(self.outcomes.iter().flat_map(|o| o.errors.iter()))
    }

    /// Combined line counts of all rewritten files.
    pub fn summary(&self) -> DiffSummary {
        let mut total = DiffSummary::default();
        for outcome in &self.outcomes {
            if let ContentOutcome::Rewritten { summary } = &outcome.content {
                total.merge(summary);
            }
        }
        total
    }

    /// Finds the outcome for a path as the walk found it.
    pub fn outcome_for(&self, path: &Path) -> Option<&FileOutcome> {
        self.outcomes.iter().find(|o| o.path == path)
    }
}

impl fmt::Display for RewriteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} file(s) visited, {} renamed, {} modified, {} failure(s)",
            self.files_visited(),
            self.files_renamed(),
            self.files_modified(),
            self.failures().count()
        )
    }
}

/// Walks a directory tree applying a [`RewriteRule`] to every file.
///
/// ```rust,no_run
/// use tree_rewrite::prelude::*;
///
/// let rule = RewriteRule::new("Oldname", "Newname")?;
/// let report = DirectoryRewriter::new(rule)
///     .matching(|f| f.exclude(".git/**"))
///     .traverse("./project")?;
///
/// println!("{report}");
/// # Ok::<(), tree_rewrite::error::RewriteError>(())
/// ```
pub struct DirectoryRewriter {
    rule: RewriteRule,
    matcher: FileMatcher,
    transform: TextTransform,
}

impl DirectoryRewriter {
    /// Creates a rewriter for the given rule.
    pub fn new(rule: RewriteRule) -> Self {
        let transform = TextTransform::from_rule(&rule);
        Self {
            rule,
            matcher: FileMatcher::new(),
            transform,
        }
    }

    /// Sets the file predicates for the traversal.
    pub fn matching<F>(mut self, f: F) -> Self
    where
        F: FnOnce(FileMatcher) -> FileMatcher,
    {
        self.matcher = f(FileMatcher::new());
        self
    }

    /// Visits every file under `root`, renaming and then rewriting each one.
    ///
    /// Only an invalid root is an error. Per-file failures are logged,
    /// recorded in the report, and the walk continues.
    pub fn traverse(&self, root: impl AsRef<Path>) -> Result<RewriteReport> {
        let root = root.as_ref();
        check_root(root)?;
        debug!(
            "Rewriting under {} ({})",
            root.display(),
            self.transform.describe()
        );

        let report = self.process_entries(self.matcher.walk(root)?);
        debug!("{report}");
        Ok(report)
    }

    /// Processes walk entries in order, recording unreadable entries and
    /// moving on.
    fn process_entries<I>(&self, entries: I) -> RewriteReport
    where
        I: IntoIterator<Item = Result<PathBuf>>,
    {
        let mut report = RewriteReport::default();
        for entry in entries {
            match entry {
                Ok(path) => report.outcomes.push(self.process_file(path)),
                Err(err) => {
                    warn!("{err}");
                    report.walk_errors.push(err);
                }
            }
        }
        report
    }

    /// Renames `path` if its base name contains the target.
    ///
    /// Returns the new path, or `None` if the name was left alone.
    pub fn rename_if_matched(&self, path: &Path) -> Result<Option<PathBuf>> {
        match RenameOperation::plan(path, &self.rule) {
            Ok(op) => {
                op.execute()?;
                Ok(Some(op.to))
            }
            Err(RenameSkip::NoMatch) => Ok(None),
            Err(skip @ RenameSkip::EmptyName) => {
                warn!("Not renaming {}: {skip}", path.display());
                Ok(None)
            }
            Err(skip) => {
                debug!("Not renaming {}: {skip}", path.display());
                Ok(None)
            }
        }
    }

    /// Reads `path`, substitutes the target, and writes the result back.
    ///
    /// The write happens even when nothing matched.
    pub fn rewrite_content_if_matched(&self, path: &Path) -> Result<FileChange> {
        let change = FileChange::load(path, &self.transform)?;
        change.apply()?;
        Ok(change)
    }

    fn process_file(&self, path: PathBuf) -> FileOutcome {
        let mut errors = Vec::new();

        let renamed_to = match self.rename_if_matched(&path) {
            Ok(Some(new_path)) => {
                info!("Renamed: {} to {}", path.display(), new_path.display());
                Some(new_path)
            }
            Ok(None) => None,
            Err(err) => {
                warn!("{err}");
                errors.push(err);
                None
            }
        };

        let current = renamed_to.as_deref().unwrap_or(&path);
        let content = match self.rewrite_content_if_matched(current) {
            Ok(change) => {
                info!("Updated file: {}", current.display());
                if change.is_modified() {
                    ContentOutcome::Rewritten {
                        summary: change.summary(),
                    }
                } else {
                    debug!("No occurrences in {}", current.display());
                    ContentOutcome::Unchanged
                }
            }
            Err(err) => {
                warn!("{err}");
                errors.push(err);
                ContentOutcome::Failed
            }
        };

        FileOutcome {
            path,
            renamed_to,
            content,
            errors,
        }
    }
}

fn check_root(root: &Path) -> Result<()> {
    let metadata = fs::metadata(root).map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            RewriteError::RootNotFound(root.to_path_buf())
        } else {
            RewriteError::Io(err)
        }
    })?;
    if !metadata.is_dir() {
        return Err(RewriteError::NotADirectory(root.to_path_buf()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    fn rewriter() -> DirectoryRewriter {
        DirectoryRewriter::new(RewriteRule::new("Oldname", "Newname").unwrap())
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture_logs<F: FnOnce()>(f: F) -> String {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_target(false)
            .with_level(false)
            .without_time()
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_rename_if_matched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Oldname_log.txt");
        fs::write(&path, "").unwrap();

        let new_path = rewriter().rename_if_matched(&path).unwrap();
        assert_eq!(new_path, Some(dir.path().join("Newname_log.txt")));
        assert!(dir.path().join("Newname_log.txt").exists());
    }

    #[test]
    fn test_rename_if_matched_leaves_other_names() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "").unwrap();

        assert_eq!(rewriter().rename_if_matched(&path).unwrap(), None);
        assert!(path.exists());
    }

    #[test]
    fn test_rewrite_content_writes_unconditionally() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "nothing here").unwrap();

        let change = rewriter().rewrite_content_if_matched(&path).unwrap();
        assert!(!change.is_modified());
        assert_eq!(fs::read_to_string(&path).unwrap(), "nothing here");
    }

    #[test]
    fn test_traverse_rejects_missing_root() {
        let dir = TempDir::new().unwrap();
        let err = rewriter().traverse(dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, RewriteError::RootNotFound(_)));
    }

    #[test]
    fn test_traverse_rejects_file_root() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("file.txt");
        fs::write(&path, "").unwrap();

        let err = rewriter().traverse(&path).unwrap_err();
        assert!(matches!(err, RewriteError::NotADirectory(_)));
    }

    #[test]
    fn test_failed_rename_rewrites_original_path() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("Oldname.txt");
        fs::write(&from, "Oldname").unwrap();
        fs::write(dir.path().join("Newname.txt"), "taken").unwrap();

        let report = rewriter().traverse(dir.path()).unwrap();
        let outcome = report.outcome_for(&from).unwrap();

        assert!(outcome.renamed_to.is_none());
        assert!(outcome.errors[0].is_rename_failure());
        assert!(outcome.is_modified());
        assert_eq!(fs::read_to_string(&from).unwrap(), "Newname");
        assert_eq!(
            fs::read_to_string(dir.path().join("Newname.txt")).unwrap(),
            "taken"
        );
    }

    #[test]
    fn test_report_display() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Oldname.txt"), "Oldname\n").unwrap();
        fs::write(dir.path().join("other.txt"), "other\n").unwrap();

        let report = rewriter().traverse(dir.path()).unwrap();
        assert_eq!(
            report.to_string(),
            "2 file(s) visited, 1 renamed, 1 modified, 0 failure(s)"
        );
        assert_eq!(report.summary().files_changed, 1);
    }

    #[test]
    fn test_progress_lines_are_logged() {
        let dir = TempDir::new().unwrap();
        let old = dir.path().join("Oldname_log.txt");
        let new = dir.path().join("Newname_log.txt");
        let blob = dir.path().join("data.bin");
        fs::write(&old, "see Oldname").unwrap();
        fs::write(&blob, [0xff, 0xfe, 0x00]).unwrap();

        let logs = capture_logs(|| {
            rewriter().traverse(dir.path()).unwrap();
        });

        assert!(logs.contains(&format!("Renamed: {} to {}", old.display(), new.display())));
        assert!(logs.contains(&format!("Updated file: {}", new.display())));
        assert!(logs.contains(&format!(
            "Error processing file {}: content is not valid UTF-8",
            blob.display()
        )));
        assert!(!logs.contains(&format!("Updated file: {}", blob.display())));
    }

    #[test]
    fn test_rename_failure_is_logged() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("Oldname.txt");
        let to = dir.path().join("Newname.txt");
        fs::write(&from, "").unwrap();
        fs::write(&to, "").unwrap();

        let logs = capture_logs(|| {
            rewriter().traverse(dir.path()).unwrap();
        });

        assert!(logs.contains(&format!(
            "Error renaming file {} to {}: destination already exists",
            from.display(),
            to.display()
        )));
        assert!(logs.contains(&format!("Updated file: {}", from.display())));
    }

    #[test]
    fn test_empty_name_skip_is_logged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Oldname");
        fs::write(&path, "Oldname").unwrap();
        let rewriter = DirectoryRewriter::new(RewriteRule::new("Oldname", "").unwrap());

        let logs = capture_logs(|| {
            assert_eq!(rewriter.rename_if_matched(&path).unwrap(), None);
        });

        assert!(logs.contains(&format!(
            "Not renaming {}: new name would be empty",
            path.display()
        )));
        assert!(path.exists());
    }

    #[test]
    fn test_walk_error_is_recorded_and_walk_continues() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "Oldname").unwrap();

        let entries = vec![
            Err(RewriteError::Walk {
                path: dir.path().join("vanished"),
                message: "entry removed during walk".to_string(),
            }),
            Ok(path.clone()),
        ];

        let mut report = RewriteReport::default();
        let logs = capture_logs(|| {
            report = rewriter().process_entries(entries);
        });

        assert_eq!(report.walk_errors.len(), 1);
        assert_eq!(report.files_visited(), 1);
        assert_eq!(report.failures().count(), 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "Newname");
        assert!(logs.contains("entry removed during walk"));
    }

    #[test]
    fn test_walk_errors_from_file_walk_reach_report() {
        let dir = TempDir::new().unwrap();
        let walk = FileMatcher::new()
            .walk(&dir.path().join("missing"))
            .unwrap();

        let report = rewriter().process_entries(walk);
        assert_eq!(report.walk_errors.len(), 1);
        assert!(matches!(report.walk_errors[0], RewriteError::Walk { .. }));
        assert_eq!(report.files_visited(), 0);
    }
}
