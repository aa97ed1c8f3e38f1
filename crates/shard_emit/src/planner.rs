//! The planner trait and the module-planning driver.

use serde::Serialize;

use shard_common::Diagnostics;
use shard_frontend::{Frontend, ModuleInfo};
use shard_graph::{walk_module, ModuleWalk, ScanPolicy, SeenSet};

use crate::error::EmitError;

/// The per-module decision made by a planner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum ModuleAction {
    /// Nothing to do: no entry points (direct mode), empty dependency
    /// list, or fully covered by an earlier module.
    Skipped,
    /// The persisted digest matched; no code generation performed.
    UpToDate,
    /// The artifact was regenerated and its digest refreshed.
    Rebuilt,
    /// Build rules were emitted for this module (deferred mode).
    Planned {
        /// Number of build rules emitted, dependency targets included.
        rules: usize,
    },
    /// The module's pipeline failed; remaining modules were unaffected.
    Failed {
        /// Human-readable failure description.
        reason: String,
    },
}

/// One `(module, action)` entry of the build plan.
#[derive(Clone, Debug, Serialize)]
pub struct Decision {
    /// The module name as requested on the command line.
    pub module: String,
    /// What the planner decided for it.
    #[serde(flatten)]
    pub action: ModuleAction,
}

/// The ordered decisions of one run.
#[derive(Debug, Default, Serialize)]
pub struct PlanSummary {
    /// Per-module decisions in processing order.
    pub decisions: Vec<Decision>,
}

impl PlanSummary {
    fn record(&mut self, module: &str, action: ModuleAction) {
        self.decisions.push(Decision {
            module: module.to_string(),
            action,
        });
    }

    /// Number of modules whose pipeline failed.
    pub fn failed_count(&self) -> usize {
        self.decisions
            .iter()
            .filter(|d| matches!(d.action, ModuleAction::Failed { .. }))
            .count()
    }

    /// Number of modules found up to date.
    pub fn up_to_date_count(&self) -> usize {
        self.decisions
            .iter()
            .filter(|d| d.action == ModuleAction::UpToDate)
            .count()
    }

    /// Total number of build rules emitted (deferred mode).
    pub fn planned_rule_count(&self) -> usize {
        self.decisions
            .iter()
            .map(|d| match d.action {
                ModuleAction::Planned { rules } => rules,
                _ => 0,
            })
            .sum()
    }

    /// Number of modules rebuilt.
    pub fn rebuilt_count(&self) -> usize {
        self.decisions
            .iter()
            .filter(|d| d.action == ModuleAction::Rebuilt)
            .count()
    }
}

/// A build back end consuming walker output, one module at a time.
///
/// Both back ends see the same walk results; only what they do with them
/// differs (recompile in-process vs. emit build rules).
pub trait ArtifactPlanner {
    /// Called once before any module is processed.
    fn begin(&mut self) -> Result<(), EmitError> {
        Ok(())
    }

    /// Plans one module from its walk result.
    fn plan_module(
        &mut self,
        frontend: &dyn Frontend,
        module: &ModuleInfo,
        walk: &ModuleWalk,
        diag: &mut Diagnostics,
    ) -> Result<ModuleAction, EmitError>;

    /// Called once after the last module; flushes any buffered output.
    fn finish(&mut self) -> Result<(), EmitError>;
}

/// Echoes accumulated toolchain diagnostics to stdout when non-empty.
fn echo_diagnostics(diag: &mut Diagnostics) {
    for message in diag.take_all() {
        println!("{message}");
    }
}

/// Runs a planner over the requested modules in command-line order.
///
/// One [`SeenSet`] spans the whole run: a module whose own source was
/// already covered by an earlier module is skipped entirely, and shared
/// dependencies produce at most one build edge across all modules.
/// Module-local failures (load, compose, link, codegen) are recorded and
/// the run continues; write failures propagate.
pub fn plan_modules(
    frontend: &dyn Frontend,
    names: &[String],
    planner: &mut dyn ArtifactPlanner,
    policy: ScanPolicy,
) -> Result<PlanSummary, EmitError> {
    planner.begin()?;

    let mut seen = SeenSet::new();
    let mut summary = PlanSummary::default();
    let mut diag = Diagnostics::new();

    for name in names {
        let loaded = frontend.load_module(name, &mut diag);
        echo_diagnostics(&mut diag);
        let module = match loaded {
            Ok(module) => module,
            Err(e) => {
                summary.record(
                    name,
                    ModuleAction::Failed {
                        reason: e.to_string(),
                    },
                );
                continue;
            }
        };

        if module.dependency_count() == 0 {
            summary.record(name, ModuleAction::Skipped);
            continue;
        }
        if !seen.insert(module.dependency_path(0)) {
            summary.record(name, ModuleAction::Skipped);
            continue;
        }

        let walk = walk_module(&module, &mut seen, policy);

        let planned = planner.plan_module(frontend, &module, &walk, &mut diag);
        echo_diagnostics(&mut diag);
        match planned {
            Ok(action) => summary.record(name, action),
            Err(e) if e.is_module_local() => summary.record(
                name,
                ModuleAction::Failed {
                    reason: e.to_string(),
                },
            ),
            Err(e) => return Err(e),
        }
    }

    planner.finish()?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use shard_frontend::{SessionOptions, SourceFrontend};

    /// A planner that records which modules reached it.
    #[derive(Default)]
    struct RecordingPlanner {
        planned: Vec<String>,
        began: bool,
        finished: bool,
    }

    impl ArtifactPlanner for RecordingPlanner {
        fn begin(&mut self) -> Result<(), EmitError> {
            self.began = true;
            Ok(())
        }

        fn plan_module(
            &mut self,
            _frontend: &dyn Frontend,
            module: &ModuleInfo,
            _walk: &ModuleWalk,
            _diag: &mut Diagnostics,
        ) -> Result<ModuleAction, EmitError> {
            self.planned.push(module.name().to_string());
            Ok(ModuleAction::Planned { rules: 0 })
        }

        fn finish(&mut self) -> Result<(), EmitError> {
            self.finished = true;
            Ok(())
        }
    }

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    fn frontend_for(dir: &Path) -> SourceFrontend {
        SourceFrontend::new(SessionOptions::new(vec![dir.to_path_buf()]))
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn driver_calls_begin_and_finish() {
        let dir = tempfile::tempdir().unwrap();
        let frontend = frontend_for(dir.path());
        let mut planner = RecordingPlanner::default();

        plan_modules(&frontend, &[], &mut planner, ScanPolicy::StopAtSeen).unwrap();
        assert!(planner.began);
        assert!(planner.finished);
    }

    #[test]
    fn load_failure_skips_only_that_module() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "good.slang",
            "[shader(\"compute\")]\nvoid main() {}\n",
        );

        let frontend = frontend_for(dir.path());
        let mut planner = RecordingPlanner::default();
        let summary = plan_modules(
            &frontend,
            &names(&["missing", "good"]),
            &mut planner,
            ScanPolicy::StopAtSeen,
        )
        .unwrap();

        assert_eq!(summary.failed_count(), 1);
        assert_eq!(planner.planned, vec!["good"]);
    }

    #[test]
    fn duplicate_module_planned_once() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "a.slang",
            "[shader(\"compute\")]\nvoid main() {}\n",
        );

        let frontend = frontend_for(dir.path());
        let mut planner = RecordingPlanner::default();
        let summary = plan_modules(
            &frontend,
            &names(&["a", "a"]),
            &mut planner,
            ScanPolicy::StopAtSeen,
        )
        .unwrap();

        assert_eq!(planner.planned, vec!["a"]);
        assert_eq!(summary.decisions.len(), 2);
        assert_eq!(summary.decisions[1].action, ModuleAction::Skipped);
    }

    #[test]
    fn module_covered_by_earlier_import_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        // a imports b; requesting [a, b] must not plan b twice.
        write(dir.path(), "a.slang", "import b;\n[shader(\"compute\")]\nvoid main() {}\n");
        write(dir.path(), "b.slang", "float3 helper();\n");

        let frontend = frontend_for(dir.path());
        let mut planner = RecordingPlanner::default();
        let summary = plan_modules(
            &frontend,
            &names(&["a", "b"]),
            &mut planner,
            ScanPolicy::StopAtSeen,
        )
        .unwrap();

        assert_eq!(planner.planned, vec!["a"]);
        assert_eq!(summary.decisions[1].action, ModuleAction::Skipped);
    }

    #[test]
    fn summary_counts() {
        let mut summary = PlanSummary::default();
        summary.record("a", ModuleAction::Rebuilt);
        summary.record("b", ModuleAction::UpToDate);
        summary.record(
            "c",
            ModuleAction::Failed {
                reason: "x".to_string(),
            },
        );
        assert_eq!(summary.rebuilt_count(), 1);
        assert_eq!(summary.up_to_date_count(), 1);
        assert_eq!(summary.failed_count(), 1);
    }

    #[test]
    fn decisions_serialize_to_json() {
        let mut summary = PlanSummary::default();
        summary.record("forward", ModuleAction::UpToDate);
        summary.record(
            "broken",
            ModuleAction::Failed {
                reason: "link failed".to_string(),
            },
        );

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"module\":\"forward\""));
        assert!(json.contains("\"action\":\"up-to-date\""));
        assert!(json.contains("link failed"));
    }
}
