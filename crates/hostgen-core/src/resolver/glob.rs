//! Interface name matching

use globset::{GlobBuilder, GlobMatcher};

/// Matches interface names against a selector pattern
///
/// A name matches if it equals the pattern exactly or matches it as a
/// glob. Patterns that are not valid globs only match exactly.
#[derive(Debug, Clone)]
pub struct InterfaceMatcher {
    pattern: String,
    glob: Option<GlobMatcher>,
}

impl InterfaceMatcher {
    /// Compile a pattern
    pub fn new(pattern: &str) -> Self {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map(|g| g.compile_matcher())
            .ok();

        Self {
            pattern: pattern.to_string(),
            glob,
        }
    }

    /// Whether `candidate` matches
    pub fn is_match(&self, candidate: &str) -> bool {
        candidate == self.pattern || self.glob.as_ref().is_some_and(|g| g.is_match(candidate))
    }
}

/// Whether `candidate` matches `pattern` exactly or as a glob
pub fn matches(pattern: &str, candidate: &str) -> bool {
    InterfaceMatcher::new(pattern).is_match(candidate)
}
