//! Shard CLI — incremental shader module compilation.
//!
//! Provides `shard compile` for cached in-process compilation and
//! `shard script` for emitting a declarative build script that a
//! downstream build executor runs incrementally.

#![warn(missing_docs)]

mod compile;
mod inputs;
mod script;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use shard_graph::ScanPolicy;

/// Shard — an incremental shader build tool.
#[derive(Parser, Debug)]
#[command(name = "shard", version, about = "Shard shader build tool")]
pub struct Cli {
    /// Suppress all output except errors and toolchain diagnostics.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print a line for every module decision.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile shader modules, skipping those whose cached digest matches.
    Compile(CompileArgs),
    /// Emit a declarative build script instead of compiling.
    Script(ScriptArgs),
}

/// Arguments for the `shard compile` subcommand.
#[derive(Parser, Debug)]
pub struct CompileArgs {
    /// Shader source files. Directory arguments are skipped.
    #[arg(required = true)]
    pub shader_files: Vec<String>,

    /// Output directory for compiled artifacts and digest files.
    #[arg(short, long)]
    pub output: String,

    /// How to treat dependencies already covered by an earlier module.
    #[arg(long, value_enum, default_value_t = CliScanPolicy::Stop)]
    pub scan_policy: CliScanPolicy,

    /// Output format for the per-module decision report.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub report: ReportFormat,
}

/// Arguments for the `shard script` subcommand.
#[derive(Parser, Debug)]
pub struct ScriptArgs {
    /// Shader source files. Directory arguments are skipped.
    #[arg(required = true)]
    pub shader_files: Vec<String>,

    /// Build directory the emitted rules write into.
    #[arg(short, long)]
    pub output: String,

    /// Path of the build script to write.
    #[arg(long)]
    pub script: String,

    /// Desired output file type(s) for entry-point modules.
    #[arg(long = "emit", default_value = "spv")]
    pub emit: Vec<String>,

    /// Additional include directory (repeatable).
    #[arg(short = 'I', long = "include")]
    pub includes: Vec<String>,

    /// Preprocessor define (repeatable, `NAME` or `NAME=VALUE`).
    #[arg(short = 'D', long = "define")]
    pub defines: Vec<String>,

    /// How to treat dependencies already covered by an earlier module.
    #[arg(long, value_enum, default_value_t = CliScanPolicy::Stop)]
    pub scan_policy: CliScanPolicy,

    /// Extra arguments forwarded verbatim into the rule command line.
    #[arg(last = true)]
    pub passthrough: Vec<String>,
}

/// Scan policy selection for already-seen dependencies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CliScanPolicy {
    /// Stop scanning the module at the first already-seen dependency.
    Stop,
    /// Skip only the already-seen dependency and keep scanning.
    Skip,
}

impl From<CliScanPolicy> for ScanPolicy {
    fn from(policy: CliScanPolicy) -> Self {
        match policy {
            CliScanPolicy::Stop => ScanPolicy::StopAtSeen,
            CliScanPolicy::Skip => ScanPolicy::SkipSeen,
        }
    }
}

/// Decision report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print per-module decision lines.
    pub verbose: bool,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version requests are not argument errors.
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
    };

    let result = match cli.command {
        Command::Compile(ref args) => compile::run(args, &global),
        Command::Script(ref args) => script::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
