//! Error types for front-end operations.

use std::path::PathBuf;

/// Errors reported by a shader front end.
///
/// Module-load failures are recoverable at the driver level (the module
/// is skipped and the run continues); compose/link/codegen failures are
/// fatal to the failing module only.
#[derive(Debug, thiserror::Error)]
pub enum FrontendError {
    /// A module name could not be resolved against the session search paths.
    #[error("module '{name}' not found in any search path")]
    ModuleNotFound {
        /// The module name as given on the command line.
        name: String,
    },

    /// An `import` or `#include` inside a source file could not be resolved.
    #[error("unresolved reference '{reference}' in {path}")]
    UnresolvedReference {
        /// The file containing the directive.
        path: PathBuf,
        /// The import or include target as written.
        reference: String,
    },

    /// An I/O error occurred while reading a source file.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Linking the composed program failed.
    #[error("failed to link module '{module}': {reason}")]
    Link {
        /// The module being linked.
        module: String,
        /// Description of the link failure.
        reason: String,
    },

    /// A target index outside the session's configured targets was requested.
    #[error("target index {index} out of range (session has {count} target(s))")]
    TargetOutOfRange {
        /// The requested target index.
        index: usize,
        /// The number of configured targets.
        count: usize,
    },
}
