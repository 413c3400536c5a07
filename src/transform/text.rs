//! Literal text replacement.

use crate::rule::RewriteRule;

/// Replaces every occurrence of a literal needle.
pub struct TextTransform {
    needle: String,
    replacement: String,
}

impl TextTransform {
    /// Creates a literal string replacement transform.
    pub fn replace_literal(needle: &str, replacement: &str) -> Self {
        Self {
            needle: needle.to_string(),
            replacement: replacement.to_string(),
        }
    }

    /// Creates the content transform for a rewrite rule.
    pub fn from_rule(rule: &RewriteRule) -> Self {
        Self::replace_literal(rule.target(), rule.replacement())
    }

    /// Applies the replacement to the given content.
    pub fn apply(&self, source: &str) -> String {
        if self.needle.is_empty() {
            return source.to_string();
        }
        source.replace(&self.needle, &self.replacement)
    }

    /// Returns a description of the transformation.
    pub fn describe(&self) -> String {
        format!("Replace literal '{}' with '{}'", self.needle, self.replacement)
    }
}
