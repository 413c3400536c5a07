//! # Tree Rewrite
//!
//! Renames files and rewrites file contents across a directory tree.
//!
//! A [`RewriteRule`] pairs a target substring with its replacement. A
//! [`DirectoryRewriter`] walks every regular file under a root and, for each
//! one:
//! 1. renames it if its base name contains the target;
//! 2. reads it as UTF-8, replaces every occurrence of the target, and writes
//!    the result back.
//!
//! Directories are never renamed. A failure on one file is logged and the
//! walk moves on to the next.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tree_rewrite::prelude::*;
//!
//! let rule = RewriteRule::new("Oldname", "Newname")?;
//! let report = DirectoryRewriter::new(rule).traverse("./my-project")?;
//!
//! for failure in report.failures() {
//!     eprintln!("{failure}");
//! }
//! println!("{report}");
//! # Ok::<(), tree_rewrite::error::RewriteError>(())
//! ```

pub mod diff;
pub mod error;
pub mod matcher;
pub mod rewriter;
pub mod rule;
pub mod transform;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::diff::DiffSummary;
    pub use crate::error::{Result, RewriteError};
    pub use crate::matcher::FileMatcher;
    pub use crate::rewriter::{ContentOutcome, DirectoryRewriter, FileOutcome, RewriteReport};
    pub use crate::rule::RewriteRule;
    pub use crate::transform::{FileChange, RenameOperation, RenameSkip, TextTransform};
}

pub use prelude::*;
