//! Error types for tree rewriting.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for rewrite operations.
#[derive(Error, Debug)]
pub enum RewriteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Glob pattern error: {0}")]
    Glob(#[from] globset::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Search root not found: {0}")]
    RootNotFound(PathBuf),

    #[error("Search root is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Error renaming file {} to {}: {source}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    #[error("Error renaming file {} to {}: destination already exists", from.display(), to.display())]
    DestinationExists { from: PathBuf, to: PathBuf },

    #[error("Error processing file {}: {source}", path.display())]
    ReadWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Error processing file {}: content is not valid UTF-8", path.display())]
    Decode { path: PathBuf },

    #[error("Error walking {}: {message}", path.display())]
    Walk { path: PathBuf, message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RewriteError {
    /// Returns true for failures of the rename step.
    pub fn is_rename_failure(&self) -> bool {
        matches!(
            self,
            RewriteError::Rename { .. } | RewriteError::DestinationExists { .. }
        )
    }

    /// Returns true for failures reading, decoding, or writing file content.
    pub fn is_read_write_failure(&self) -> bool {
        matches!(
            self,
            RewriteError::ReadWrite { .. } | RewriteError::Decode { .. }
        )
    }
}

/// A specialized Result type for rewrite operations.
pub type Result<T> = std::result::Result<T, RewriteError>;
