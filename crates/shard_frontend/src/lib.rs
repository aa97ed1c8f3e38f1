//! Shader front-end interface and the built-in source-scanning front end.
//!
//! The build engine consumes the front end through three narrow traits:
//! [`Frontend`] loads modules and reports their dependency lists and entry
//! points, [`ComposedProgram`] produces per-entry-point content digests,
//! and [`LinkedProgram`] extracts target code. A native compiler binding
//! implements the same seam; the shipped [`SourceFrontend`] resolves
//! `import` and `#include` edges directly from shader source text.

#![warn(missing_docs)]

pub mod error;
pub mod module;
pub mod options;
pub mod source;

pub use error::FrontendError;
pub use module::{ComposedProgram, Frontend, LinkedProgram, ModuleInfo};
pub use options::{OptLevel, SessionOptions};
pub use source::SourceFrontend;

/// File extension of shader module sources.
pub const MODULE_EXT: &str = "slang";

/// Reserved file extension of header-only includes. Headers never become
/// build targets of their own.
pub const HEADER_EXT: &str = "slangh";
