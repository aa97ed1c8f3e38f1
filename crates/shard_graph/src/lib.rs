//! Dependency graph walking for incremental shader builds.
//!
//! For each requested module the walker scans its front-end-reported
//! dependency list, classifies every entry as a header or a compiled
//! module, and deduplicates entries already covered by a previously
//! processed module. The resulting ordered edge list drives both build
//! back ends.

#![warn(missing_docs)]

pub mod seen;
pub mod walk;

pub use seen::SeenSet;
pub use walk::{classify, walk_module, DepEdge, DepKind, ModuleWalk, ScanPolicy, WalkedDep};
