//! Build plan emission for incremental shader compilation.
//!
//! Two interchangeable back ends consume the dependency walker's output
//! through the [`ArtifactPlanner`] trait: [`DirectPlanner`] recompiles
//! stale artifacts in-process against the digest cache, and
//! [`ScriptPlanner`] writes a declarative build script (one shared rule
//! plus per-target dependency edges) for a downstream build executor.
//! The [`plan_modules`] driver runs either back end over the requested
//! modules in command-line order.

#![warn(missing_docs)]

pub mod direct;
pub mod error;
pub mod planner;
pub mod script;

pub use direct::DirectPlanner;
pub use error::EmitError;
pub use planner::{plan_modules, ArtifactPlanner, Decision, ModuleAction, PlanSummary};
pub use script::{RuleConfig, ScriptPlanner};

/// Output extension for compiled entry-point binaries.
pub const BINARY_EXT: &str = "spv";

/// Output extension for dependency-only module intermediates.
pub const INTERMEDIATE_EXT: &str = "slang-module";
