//! `shard script` — declarative build script generation.

use std::path::{Path, PathBuf};

use shard_emit::{plan_modules, RuleConfig, ScriptPlanner};
use shard_frontend::{SessionOptions, SourceFrontend};

use crate::inputs::collect_modules;
use crate::{GlobalArgs, ScriptArgs};

/// Runs the `shard script` command.
///
/// Writes a build script with one shared rule plus one build-target line
/// per artifact, in command-line module order. Returns exit code 0 on
/// success, 1 when any module failed to load or plan.
pub fn run(args: &ScriptArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let inputs = collect_modules(&args.shader_files);
    if inputs.names.is_empty() {
        eprintln!("error: no shader files among the given arguments");
        return Ok(1);
    }

    let mut options = SessionOptions::new(inputs.search_paths);
    options.defines = args.defines.clone();
    for include in &args.includes {
        options.add_search_path(Path::new(include));
    }
    let frontend = SourceFrontend::new(options);

    let rule = RuleConfig {
        include_dirs: args.includes.iter().map(PathBuf::from).collect(),
        defines: args.defines.clone(),
        extra_args: args.passthrough.clone(),
        ..RuleConfig::default()
    };
    let mut planner = ScriptPlanner::new(
        Path::new(&args.script),
        Path::new(&args.output),
        args.emit.clone(),
        rule,
    );

    let summary = plan_modules(
        &frontend,
        &inputs.names,
        &mut planner,
        args.scan_policy.into(),
    )?;

    if !global.quiet {
        eprintln!(
            "   Wrote {} ({} build rule(s))",
            args.script,
            summary.planned_rule_count()
        );
    }

    Ok(if summary.failed_count() > 0 { 1 } else { 0 })
}
