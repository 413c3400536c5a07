//! Selection of the files a rewrite visits.

pub mod file;

pub use file::{FileMatcher, FileWalk};
