//! Transformations applied to file names and file contents.

pub mod file;
pub mod text;

pub use file::{RenameOperation, RenameSkip, rename_target};
pub use text::TextTransform;

use crate::diff::DiffSummary;
use crate::error::{RewriteError, Result};
use std::path::{Path, PathBuf};

/// Content read from a file together with its transformed form.
#[derive(Debug, Clone)]
pub struct FileChange {
    pub path: PathBuf,
    pub original: String,
    pub transformed: String,
}

impl FileChange {
    /// Reads `path` as UTF-8 and runs `transform` over it.
    pub fn load(path: &Path, transform: &TextTransform) -> Result<Self> {
        let original = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::InvalidData {
                RewriteError::Decode {
                    path: path.to_path_buf(),
                }
            } else {
                RewriteError::ReadWrite {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        let transformed = transform.apply(&original);
        Ok(Self {
            path: path.to_path_buf(),
            original,
            transformed,
        })
    }

    /// Returns true if the content was modified.
    pub fn is_modified(&self) -> bool {
        self.original != self.transformed
    }

    /// Returns line counts for the change.
    pub fn summary(&self) -> DiffSummary {
        DiffSummary::from_diff(&self.original, &self.transformed)
    }

    /// Writes the transformed content to disk, truncating the file.
    ///
    /// The write happens even when nothing changed.
    pub fn apply(&self) -> Result<()> {
        std::fs::write(&self.path, &self.transformed).map_err(|source| RewriteError::ReadWrite {
            path: self.path.clone(),
            source,
        })
    }
}
