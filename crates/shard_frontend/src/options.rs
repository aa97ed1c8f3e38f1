//! Session configuration shared by all modules in one invocation.

use std::path::{Path, PathBuf};

/// Optimization level requested from the shader compiler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptLevel {
    /// No optimization.
    None,
    /// Default optimization.
    Default,
    /// Maximal optimization.
    Maximal,
}

impl OptLevel {
    fn digest_tag(self) -> &'static [u8] {
        match self {
            OptLevel::None => b"O0",
            OptLevel::Default => b"O1",
            OptLevel::Maximal => b"O3",
        }
    }
}

/// Per-invocation compiler session configuration.
///
/// Initialized once at start of run and shared by every module processed
/// in that run. The defines and optimization level participate in program
/// digests: changing either invalidates cached artifacts.
#[derive(Clone, Debug)]
pub struct SessionOptions {
    /// Directories searched when resolving module names and includes.
    pub search_paths: Vec<PathBuf>,

    /// Preprocessor defines (`NAME` or `NAME=VALUE`).
    pub defines: Vec<String>,

    /// Requested optimization level.
    pub optimization: OptLevel,
}

impl SessionOptions {
    /// Creates options with the given search paths, no defines, and
    /// maximal optimization.
    pub fn new(search_paths: Vec<PathBuf>) -> Self {
        Self {
            search_paths,
            defines: Vec::new(),
            optimization: OptLevel::Maximal,
        }
    }

    /// Adds a search path if it is not already present.
    pub fn add_search_path(&mut self, path: &Path) {
        if !self.search_paths.iter().any(|p| p == path) {
            self.search_paths.push(path.to_path_buf());
        }
    }

    /// Mixes the digest-relevant options into a hash builder.
    pub fn mix_into(&self, builder: &mut shard_common::hash::HashBuilder) {
        for define in &self.defines {
            builder.update(define.as_bytes());
        }
        builder.update(self.optimization.digest_tag());
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
