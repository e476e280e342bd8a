//! Glob expansion seam
//!
//! The core never touches the filesystem. When an Include carries a glob
//! fragment, the evaluator asks a `GlobExpander` for the concrete values.

use crate::errors::Result;
use crate::itemspec::GlobMatcher;

/// Resolves an Include glob into item values
pub trait GlobExpander: Send + Sync {
    /// Values matching `glob`, in a stable order
    ///
    /// # Errors
    ///
    /// Implementations report lookup failures as `ItemEvalError`s; the
    /// Include that asked fails without adding anything.
    fn expand(&self, glob: &GlobMatcher) -> Result<Vec<String>>;
}

/// Expander for hosts that resolve globs elsewhere; always yields nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGlobExpansion;

impl GlobExpander for NoGlobExpansion {
    fn expand(&self, _glob: &GlobMatcher) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

/// Fixed list of paths, matched in insertion order
#[derive(Debug, Clone, Default)]
pub struct InMemoryFileSet {
    paths: Vec<String>,
}

impl InMemoryFileSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.paths.push(path.into());
        self
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for InMemoryFileSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            paths: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl GlobExpander for InMemoryFileSet {
    fn expand(&self, glob: &GlobMatcher) -> Result<Vec<String>> {
        Ok(self
            .paths
            .iter()
            .filter(|path| glob.matches(path))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_expansion_keeps_order() {
        let files: InMemoryFileSet = ["b.cs", "a.cs", "readme.md", "src/c.cs"]
            .into_iter()
            .collect();
        let glob = GlobMatcher::compile("*.cs", true).unwrap();

        assert_eq!(files.expand(&glob).unwrap(), vec!["b.cs", "a.cs"]);
    }

    #[test]
    fn test_no_expansion() {
        let glob = GlobMatcher::compile("**/*", true).unwrap();
        assert!(NoGlobExpansion.expand(&glob).unwrap().is_empty());
    }
}
