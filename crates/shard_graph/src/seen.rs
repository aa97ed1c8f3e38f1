//! The cross-module deduplication set.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Dependency file paths already classified during this invocation.
///
/// Created once per run and passed by mutable reference into each
/// module's walk, so the cross-module sharing is visible at every call
/// site. A given path is classified and emitted at most once per run,
/// no matter how many modules reference it.
#[derive(Debug, Default)]
pub struct SeenSet {
    paths: HashSet<PathBuf>,
}

impl SeenSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a path. Returns `false` if it was already present.
    pub fn insert(&mut self, path: &Path) -> bool {
        self.paths.insert(path.to_path_buf())
    }

    /// Returns `true` if the path has already been recorded.
    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    /// Number of recorded paths.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Returns `true` if nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_reports_first_occurrence() {
        let mut seen = SeenSet::new();
        assert!(seen.insert(Path::new("a.slang")));
        assert!(!seen.insert(Path::new("a.slang")));
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn contains_after_insert() {
        let mut seen = SeenSet::new();
        assert!(!seen.contains(Path::new("h.slangh")));
        seen.insert(Path::new("h.slangh"));
        assert!(seen.contains(Path::new("h.slangh")));
    }

    #[test]
    fn distinct_paths_are_distinct() {
        let mut seen = SeenSet::new();
        seen.insert(Path::new("shaders/a.slang"));
        assert!(!seen.contains(Path::new("a.slang")));
    }
}
