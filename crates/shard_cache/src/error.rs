//! Error types for cache and artifact output operations.

use std::path::PathBuf;

/// Errors that can occur while writing artifacts or digest files.
///
/// Reads are fail-safe (a missing or unreadable digest is a cache miss),
/// so only writes produce errors. Silent partial output is a correctness
/// hazard for a build tool, so write failures propagate to a non-zero
/// exit instead of being logged and ignored.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// An I/O error occurred while writing an artifact or digest file.
    #[error("failed to write {path}: {source}")]
    Write {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The output directory could not be created.
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        /// The directory path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_error_display() {
        let err = CacheError::Write {
            path: PathBuf::from("out/forward.spv"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("forward.spv"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn create_dir_error_display() {
        let err = CacheError::CreateDir {
            path: PathBuf::from("out"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        };
        assert!(err.to_string().contains("output directory"));
    }
}
