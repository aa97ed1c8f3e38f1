//! `shard compile` — cached in-process compilation.

use std::path::Path;

use shard_emit::{plan_modules, DirectPlanner, ModuleAction, PlanSummary};
use shard_frontend::{SessionOptions, SourceFrontend};

use crate::inputs::collect_modules;
use crate::{CompileArgs, GlobalArgs, ReportFormat};

/// Runs the `shard compile` command.
///
/// Returns exit code 0 when every requested module is up to date,
/// rebuilt, or skipped; 1 when any module's pipeline failed.
pub fn run(args: &CompileArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let inputs = collect_modules(&args.shader_files);
    if inputs.names.is_empty() {
        eprintln!("error: no shader files among the given arguments");
        return Ok(1);
    }

    let frontend = SourceFrontend::new(SessionOptions::new(inputs.search_paths));
    let mut planner = DirectPlanner::new(Path::new(&args.output));

    let summary = plan_modules(
        &frontend,
        &inputs.names,
        &mut planner,
        args.scan_policy.into(),
    )?;

    report(&summary, args.report, global);

    Ok(if summary.failed_count() > 0 { 1 } else { 0 })
}

/// Prints the per-module decision report.
fn report(summary: &PlanSummary, format: ReportFormat, global: &GlobalArgs) {
    match format {
        ReportFormat::Text => {
            if global.verbose {
                for decision in &summary.decisions {
                    let what = match &decision.action {
                        ModuleAction::Skipped => "skipped".to_string(),
                        ModuleAction::UpToDate => "up to date".to_string(),
                        ModuleAction::Rebuilt => "rebuilt".to_string(),
                        ModuleAction::Planned { rules } => format!("{rules} rule(s)"),
                        ModuleAction::Failed { reason } => format!("failed: {reason}"),
                    };
                    eprintln!("  {} {}", decision.module, what);
                }
            }
            if !global.quiet {
                eprintln!(
                    "   {} rebuilt, {} up to date, {} failed",
                    summary.rebuilt_count(),
                    summary.up_to_date_count(),
                    summary.failed_count()
                );
            }
        }
        ReportFormat::Json => {
            let json =
                serde_json::to_string_pretty(summary).unwrap_or_else(|_| "[]".to_string());
            println!("{json}");
        }
    }
}
