//! File renames driven by a rewrite rule.

use crate::error::{RewriteError, Result};
use crate::rule::RewriteRule;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Why a file was left under its old name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameSkip {
    /// The base name does not contain the target.
    NoMatch,
    /// The base name is not valid UTF-8.
    NonUtf8Name,
    /// The rule maps the name to itself.
    Unchanged,
    /// The rule would leave an empty name.
    EmptyName,
}

impl fmt::Display for RenameSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            RenameSkip::NoMatch => "name does not contain the target",
            RenameSkip::NonUtf8Name => "name is not valid UTF-8",
            RenameSkip::Unchanged => "rule leaves the name unchanged",
            RenameSkip::EmptyName => "new name would be empty",
        };
        f.write_str(reason)
    }
}

/// Computes the renamed path for `path`, if the rule changes its base name.
///
/// Only the final component is rewritten; the parent directory is kept.
pub fn rename_target(
    path: &Path,
    rule: &RewriteRule,
) -> std::result::Result<PathBuf, RenameSkip> {
    let name = match path.file_name() {
        Some(name) => name.to_str().ok_or(RenameSkip::NonUtf8Name)?,
        None => return Err(RenameSkip::NoMatch),
    };
    if !rule.matches(name) {
        return Err(RenameSkip::NoMatch);
    }
    let new_name = rule.apply(name);
    if new_name == name {
        return Err(RenameSkip::Unchanged);
    }
    if new_name.is_empty() {
        return Err(RenameSkip::EmptyName);
    }
    Ok(path.with_file_name(new_name))
}

/// A rename of one file within its directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameOperation {
    pub from: PathBuf,
    pub to: PathBuf,
}

impl RenameOperation {
    /// Plans the rename of `path` under `rule`.
    pub fn plan(path: &Path, rule: &RewriteRule) -> std::result::Result<Self, RenameSkip> {
        rename_target(path, rule).map(|to| Self {
            from: path.to_path_buf(),
            to,
        })
    }

    /// Executes the rename.
    ///
    /// Fails without touching the disk if the destination is another
    /// existing entry. A destination that only differs in case and resolves
    /// to the source itself is not a collision.
    pub fn execute(&self) -> Result<()> {
        if let Ok(existing) = fs::symlink_metadata(&self.to)
            && !self.is_case_variant_of_source(&existing)
        {
            return Err(RewriteError::DestinationExists {
                from: self.from.clone(),
                to: self.to.clone(),
            });
        }
        fs::rename(&self.from, &self.to).map_err(|source| RewriteError::Rename {
            from: self.from.clone(),
            to: self.to.clone(),
            source,
        })
    }

    fn is_case_variant_of_source(&self, existing: &fs::Metadata) -> bool {
        let same_name = match (self.from.file_name(), self.to.file_name()) {
            (Some(from), Some(to)) => {
                from.to_string_lossy().to_lowercase() == to.to_string_lossy().to_lowercase()
            }
            _ => false,
        };
        same_name && same_entry(&self.from, &self.to, existing)
    }
}

#[cfg(unix)]
fn same_entry(from: &Path, _to: &Path, existing: &fs::Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;

    fs::symlink_metadata(from)
        .map(|meta| meta.dev() == existing.dev() && meta.ino() == existing.ino())
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn same_entry(from: &Path, to: &Path, _existing: &fs::Metadata) -> bool {
    match (fs::canonicalize(from), fs::canonicalize(to)) {
        (Ok(from), Ok(to)) => from == to,
        _ => false,
    }
}
