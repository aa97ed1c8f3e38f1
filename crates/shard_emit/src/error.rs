//! Error types for build plan emission.

use std::path::PathBuf;

use shard_cache::CacheError;
use shard_frontend::FrontendError;

/// Errors raised while planning or emitting builds.
///
/// `Frontend` errors are fatal to the failing module only: the driver
/// records the failure and continues with the remaining modules. Cache
/// and script write errors abort the run, since partial build output
/// must not pass silently.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    /// A front-end operation (compose, link, codegen) failed.
    #[error(transparent)]
    Frontend(#[from] FrontendError),

    /// Writing an artifact or digest file failed.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Writing the build script failed.
    #[error("failed to write build script {path}: {source}")]
    Script {
        /// The build script path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

impl EmitError {
    /// Returns `true` if this error aborts only the current module.
    pub fn is_module_local(&self) -> bool {
        matches!(self, EmitError::Frontend(_))
    }
}
