//! Digest file persistence and the staleness check.

use std::path::{Path, PathBuf};

use shard_common::ContentHash;

use crate::error::CacheError;

/// File extension of persisted digest files.
pub const DIGEST_EXT: &str = "hash";

/// Store for per-artifact digest files and compiled output.
///
/// Rooted at the output directory; each module's digest lives at
/// `<dir>/<name>.hash` as raw bytes with no header, next to the compiled
/// artifact it describes.
pub struct DigestStore {
    output_dir: PathBuf,
}

impl DigestStore {
    /// Creates a store rooted at the given output directory.
    pub fn new(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
        }
    }

    /// Makes sure the output directory exists.
    pub fn ensure_dir(&self) -> Result<(), CacheError> {
        std::fs::create_dir_all(&self.output_dir).map_err(|e| CacheError::CreateDir {
            path: self.output_dir.clone(),
            source: e,
        })
    }

    /// Path of the digest file for a module.
    pub fn digest_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{name}.{DIGEST_EXT}"))
    }

    /// Path of a compiled artifact for a module.
    pub fn artifact_path(&self, name: &str, ext: &str) -> PathBuf {
        self.output_dir.join(format!("{name}.{ext}"))
    }

    /// Decides whether a module's artifact is still valid.
    ///
    /// Reads the persisted digest file in full as raw bytes. Stale if the
    /// file is missing, unreadable, or of a different length than the
    /// fresh digest; otherwise the stored bytes are compared
    /// byte-for-byte against the freshly computed digest. Never an error:
    /// any read problem is a cache miss.
    pub fn is_up_to_date(&self, name: &str, fresh: &ContentHash) -> bool {
        let Ok(stored) = std::fs::read(self.digest_path(name)) else {
            return false;
        };
        if stored.len() != fresh.as_bytes().len() {
            return false;
        }
        stored.as_slice() == fresh.as_bytes().as_slice()
    }

    /// Overwrites the module's digest file with the fresh digest.
    ///
    /// Called only after a successful rebuild. Not transactional: a
    /// partial write just means the next run sees the artifact as stale
    /// again.
    pub fn write_digest(&self, name: &str, digest: &ContentHash) -> Result<(), CacheError> {
        let path = self.digest_path(name);
        std::fs::write(&path, digest.as_bytes()).map_err(|e| CacheError::Write { path, source: e })
    }

    /// Writes compiled target code verbatim to `<dir>/<name>.<ext>`.
    pub fn write_artifact(&self, name: &str, ext: &str, bytes: &[u8]) -> Result<PathBuf, CacheError> {
        let path = self.artifact_path(name, ext);
        std::fs::write(&path, bytes).map_err(|e| CacheError::Write {
            path: path.clone(),
            source: e,
        })?;
        Ok(path)
    }
}
