//! Shared foundational types for the Shard shader build tool.
//!
//! This crate provides the content hash used for cache invalidation and the
//! diagnostics accumulator that collects toolchain output for echoing.

#![warn(missing_docs)]

pub mod diag;
pub mod hash;

pub use diag::Diagnostics;
pub use hash::ContentHash;
