//! The substitution rule applied to file names and file contents.

use crate::error::{RewriteError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Token searched for when no rule is configured.
pub const DEFAULT_TARGET: &str = "Riiverse";

/// Token substituted when no rule is configured.
pub const DEFAULT_REPLACEMENT: &str = "Riiverse";

/// An immutable pair of target and replacement tokens.
///
/// Construct with [`RewriteRule::new`] or [`RewriteRule::from_json_file`];
/// both validate the tokens before a rule can be used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRule {
    target: String,
    replacement: String,
}

impl RewriteRule {
    /// Creates a validated rule.
    pub fn new(target: impl Into<String>, replacement: impl Into<String>) -> Result<Self> {
        let rule = Self {
            target: target.into(),
            replacement: replacement.into(),
        };
        rule.validate()?;
        Ok(rule)
    }

    /// Loads a rule from a JSON file of the form
    /// `{"target": "...", "replacement": "..."}`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Parses a rule from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let rule: RewriteRule = serde_json::from_str(json)?;
        rule.validate()?;
        Ok(rule)
    }

    /// The substring searched for.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The substring written in place of the target.
    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Returns true when applying the rule can never change anything.
    pub fn is_identity(&self) -> bool {
        self.target == self.replacement
    }

    /// Returns true if `text` contains the target.
    pub fn matches(&self, text: &str) -> bool {
        text.contains(&self.target)
    }

    /// Replaces every occurrence of the target in `text`.
    pub fn apply(&self, text: &str) -> String {
        text.replace(&self.target, &self.replacement)
    }

    fn validate(&self) -> Result<()> {
        if self.target.is_empty() {
            return Err(RewriteError::InvalidConfig(
                "target must not be empty".to_string(),
            ));
        }
        for (label, token) in [("target", &self.target), ("replacement", &self.replacement)] {
            if token.chars().any(std::path::is_separator) {
                return Err(RewriteError::InvalidConfig(format!(
                    "{label} '{token}' must not contain a path separator"
                )));
            }
        }
        Ok(())
    }
}

impl Default for RewriteRule {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET.to_string(),
            replacement: DEFAULT_REPLACEMENT.to_string(),
        }
    }
}
