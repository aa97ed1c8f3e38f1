//! Artifact digest cache for incremental shader compilation.
//!
//! One raw digest file is persisted per compiled artifact, co-located
//! with it and named after the module. Staleness is decided by comparing
//! the stored bytes against a freshly computed digest; any read problem
//! counts as stale, never as an error.

#![warn(missing_docs)]

pub mod digest;
pub mod error;

pub use digest::DigestStore;
pub use error::CacheError;
