//! Recursive file discovery.

use crate::error::{RewriteError, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Predicates for the files visited under a search root.
///
/// With no predicates every regular file is visited.
#[derive(Default, Clone)]
pub struct FileMatcher {
    exclude_globs: Vec<String>,
}

impl FileMatcher {
    /// Creates a new file matcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Excludes files matching the glob pattern, relative to the root.
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_globs.push(pattern.into());
        self
    }

    /// Excludes files matching any of the glob patterns.
    pub fn excludes(mut self, patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.exclude_globs
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Starts a lazy walk over the files under `root`.
    ///
    /// Symlinks to files are yielded as files; symlinked directories are
    /// not followed.
    ///
    /// Entries within a directory come in file name order. Each directory's
    /// listing is read in full before its entries are yielded, so files
    /// renamed while walking are not seen twice.
    pub fn walk(&self, root: &Path) -> Result<FileWalk> {
        let exclude = build_glob_set(&self.exclude_globs)?;
        let inner = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();
        Ok(FileWalk {
            root: root.to_path_buf(),
            inner,
            exclude,
        })
    }

    /// Collects all matching files from the given root directory.
    ///
    /// Entries the walk cannot read are skipped.
    pub fn collect(&self, root: &Path) -> Result<Vec<PathBuf>> {
        Ok(self.walk(root)?.filter_map(|e| e.ok()).collect())
    }
}

/// Iterator over the files under a root.
pub struct FileWalk {
    root: PathBuf,
    inner: walkdir::IntoIter,
    exclude: GlobSet,
}

impl Iterator for FileWalk {
    type Item = Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.root.clone());
                    return Some(Err(RewriteError::Walk {
                        path,
                        message: err.to_string(),
                    }));
                }
            };

            if !is_file_entry(&entry) {
                continue;
            }

            let path = entry.path();
            let rel_path = path.strip_prefix(&self.root).unwrap_or(path);
            if self.exclude.is_match(rel_path) {
                continue;
            }

            return Some(Ok(entry.into_path()));
        }
    }
}

/// Regular files, and symlinks whose target is a file.
///
/// Symlinks to directories are listed but never descended into.
fn is_file_entry(entry: &walkdir::DirEntry) -> bool {
    if entry.file_type().is_file() {
        return true;
    }
    entry.path_is_symlink()
        && fs::metadata(entry.path())
            .map(|meta| meta.is_file())
            .unwrap_or(false)
}

fn build_glob_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}
