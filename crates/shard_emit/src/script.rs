//! The deferred back end: declarative build script emission.
//!
//! Writes a Ninja-style build script: one shared rule declaration,
//! followed by one `build` line per artifact. Dependency-only modules
//! become `.slang-module` intermediate targets; entry-point modules get
//! one `build` line per requested output file type. Header includes are
//! excluded from every prerequisite list; they affect staleness through
//! the module that includes them.

use std::path::{Path, PathBuf};

use shard_common::Diagnostics;
use shard_frontend::{Frontend, ModuleInfo};
use shard_graph::{classify, DepKind, ModuleWalk};

use crate::error::EmitError;
use crate::planner::{ArtifactPlanner, ModuleAction};
use crate::INTERMEDIATE_EXT;

/// Name of the single shared rule all targets reuse.
const RULE_NAME: &str = "slang";

/// The shared rule's command line configuration.
///
/// The command template and the accumulated include/define flags are
/// configuration, not graph logic; they are emitted once per script and
/// reused by every target.
#[derive(Clone, Debug)]
pub struct RuleConfig {
    /// Compiler executable invoked by the rule.
    pub compiler: String,
    /// Additional include directories (`-I`).
    pub include_dirs: Vec<PathBuf>,
    /// Preprocessor defines (`-D`).
    pub defines: Vec<String>,
    /// Trailing arguments forwarded verbatim into the command line.
    pub extra_args: Vec<String>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            compiler: "slangc".to_string(),
            include_dirs: Vec::new(),
            defines: Vec::new(),
            extra_args: Vec::new(),
        }
    }
}

/// Emits a declarative build script instead of compiling in-process.
///
/// Output is buffered and flushed to the script path in `finish`, so a
/// failed run never leaves a truncated script behind an old one's name.
pub struct ScriptPlanner {
    script_path: PathBuf,
    script_dir: PathBuf,
    build_dir: PathBuf,
    output_exts: Vec<String>,
    rule: RuleConfig,
    text: String,
}

impl ScriptPlanner {
    /// Creates a script planner.
    ///
    /// `output_exts` lists the desired output file types for entry-point
    /// modules; each produces one `build` line per module.
    pub fn new(
        script_path: &Path,
        build_dir: &Path,
        output_exts: Vec<String>,
        rule: RuleConfig,
    ) -> Self {
        let script_dir = script_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            script_path: script_path.to_path_buf(),
            script_dir,
            build_dir: build_dir.to_path_buf(),
            output_exts,
            rule,
            text: String::new(),
        }
    }

    /// The script text accumulated so far.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Renders a path relative to the script's own directory when it is
    /// inside it; other paths are left as given.
    fn rel(&self, path: &Path) -> String {
        let stripped = path.strip_prefix(&self.script_dir).unwrap_or(path);
        if stripped.as_os_str().is_empty() {
            ".".to_string()
        } else {
            stripped.display().to_string()
        }
    }

    /// Intermediate target path for a dependency source file.
    fn intermediate_target(&self, source: &Path) -> PathBuf {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.build_dir.join(format!("{stem}.{INTERMEDIATE_EXT}"))
    }

    /// Emits one `build` line.
    ///
    /// Prerequisites are the module's dependencies from `prereq_from`
    /// onward, headers excluded, each named by its intermediate target.
    fn emit_build(&mut self, output: &Path, input: &Path, module: &ModuleInfo, prereq_from: usize) {
        let mut line = format!("build {}: {RULE_NAME} {}", self.rel(output), self.rel(input));

        let from = prereq_from.min(module.dependency_count());
        let prereqs: Vec<String> = module.dependencies()[from..]
            .iter()
            .filter(|dep| classify(dep) != DepKind::Header)
            .map(|dep| self.rel(&self.intermediate_target(dep)))
            .collect();
        if !prereqs.is_empty() {
            line.push_str(" | ");
            line.push_str(&prereqs.join(" "));
        }

        self.text.push_str(&line);
        self.text.push('\n');
    }
}

impl ArtifactPlanner for ScriptPlanner {
    fn begin(&mut self) -> Result<(), EmitError> {
        let build_dir = self.build_dir.clone();
        let mut command = format!(
            "{} $in -o $out -I {}",
            self.rule.compiler,
            self.rel(&build_dir)
        );
        for dir in &self.rule.include_dirs {
            command.push_str(" -I ");
            command.push_str(&dir.display().to_string());
        }
        for define in &self.rule.defines {
            command.push_str(" -D ");
            command.push_str(define);
        }
        for arg in &self.rule.extra_args {
            command.push(' ');
            command.push_str(arg);
        }

        self.text.push_str("rule ");
        self.text.push_str(RULE_NAME);
        self.text.push('\n');
        self.text.push_str("    command = ");
        self.text.push_str(&command);
        self.text.push('\n');
        Ok(())
    }

    fn plan_module(
        &mut self,
        _frontend: &dyn Frontend,
        module: &ModuleInfo,
        walk: &ModuleWalk,
        _diag: &mut Diagnostics,
    ) -> Result<ModuleAction, EmitError> {
        let mut rules = 0;

        // Dependency targets first, in walk order.
        let emitted: Vec<_> = walk.emitted().cloned().collect();
        for edge in &emitted {
            let output = self.intermediate_target(&edge.path);
            self.emit_build(&output, &edge.path, module, edge.index + 1);
            rules += 1;
        }

        // The module's own target(s). A module with no entry points and
        // no dependencies beyond its own source has nothing to build.
        if module.entry_point_count() > 0 {
            let exts = self.output_exts.clone();
            for ext in &exts {
                let output = self.build_dir.join(format!("{}.{ext}", module.name()));
                self.emit_build(&output, module.dependency_path(0), module, 1);
                rules += 1;
            }
        } else if module.dependency_count() > 1 {
            let output = self.intermediate_target(module.dependency_path(0));
            self.emit_build(&output, module.dependency_path(0), module, 1);
            rules += 1;
        }

        Ok(ModuleAction::Planned { rules })
    }

    fn finish(&mut self) -> Result<(), EmitError> {
        std::fs::write(&self.script_path, &self.text).map_err(|e| EmitError::Script {
            path: self.script_path.clone(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use shard_frontend::{SessionOptions, SourceFrontend};
    use shard_graph::ScanPolicy;

    use crate::planner::plan_modules;

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    /// Generates a script for the given modules and returns its text.
    fn generate(src_dir: &Path, out_dir: &Path, modules: &[&str], exts: &[&str]) -> String {
        let frontend = SourceFrontend::new(SessionOptions::new(vec![src_dir.to_path_buf()]));
        let script = out_dir.join("build.ninja");
        let mut planner = ScriptPlanner::new(
            &script,
            out_dir,
            exts.iter().map(|s| s.to_string()).collect(),
            RuleConfig::default(),
        );
        plan_modules(&frontend, &names(modules), &mut planner, ScanPolicy::StopAtSeen).unwrap();
        std::fs::read_to_string(&script).unwrap()
    }

    fn build_lines(script: &str) -> Vec<&str> {
        script.lines().filter(|l| l.starts_with("build ")).collect()
    }

    #[test]
    fn rule_preamble_emitted_once() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        std::fs::create_dir_all(&out).unwrap();
        write(
            dir.path(),
            "a.slang",
            "[shader(\"compute\")]\nvoid main() {}\n",
        );

        let script = generate(dir.path(), &out, &["a"], &["spv"]);
        assert_eq!(script.matches("rule slang").count(), 1);
        assert!(script.contains("command = slangc $in -o $out -I "));
    }

    #[test]
    fn entry_point_module_with_no_extra_deps() {
        // One binary rule referencing the module's source, no rule for a
        // module with neither entry points nor dependencies.
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        std::fs::create_dir_all(&out).unwrap();
        write(
            dir.path(),
            "a.slang",
            "[shader(\"compute\")]\nvoid main() {}\n",
        );
        write(dir.path(), "b.slang", "float3 helper();\n");

        let script = generate(dir.path(), &out, &["a", "b"], &["spv"]);
        let lines = build_lines(&script);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("build a.spv: slang "));
        assert!(lines[0].contains("a.slang"));
    }

    #[test]
    fn dependency_module_becomes_intermediate_target() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        std::fs::create_dir_all(&out).unwrap();
        write(
            dir.path(),
            "main.slang",
            "import lights;\n[shader(\"compute\")]\nvoid main() {}\n",
        );
        write(dir.path(), "lights.slang", "float3 lightDir();\n");

        let script = generate(dir.path(), &out, &["main"], &["spv"]);
        let lines = build_lines(&script);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("build lights.slang-module: slang "));
        assert!(lines[1].starts_with("build main.spv: slang "));
        assert!(lines[1].contains(" | lights.slang-module"));
    }

    #[test]
    fn shared_dependency_emitted_once_across_modules() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        std::fs::create_dir_all(&out).unwrap();
        write(
            dir.path(),
            "a.slang",
            "#include \"h.slangh\"\nimport m;\n[shader(\"compute\")]\nvoid main() {}\n",
        );
        write(
            dir.path(),
            "b.slang",
            "#include \"h.slangh\"\nimport m;\n[shader(\"compute\")]\nvoid run() {}\n",
        );
        write(dir.path(), "h.slangh", "#define PI 3.14\n");
        write(dir.path(), "m.slang", "float3 shared();\n");

        let script = generate(dir.path(), &out, &["a", "b"], &["spv"]);
        let m_targets = build_lines(&script)
            .iter()
            .filter(|l| l.starts_with("build m.slang-module:"))
            .count();
        assert_eq!(m_targets, 1);

        // The header never appears as a build target or prerequisite.
        for line in build_lines(&script) {
            assert!(!line.contains("h.slangh"), "header leaked into: {line}");
            assert!(!line.contains("h.slang-module"), "header target in: {line}");
        }
    }

    #[test]
    fn multiple_output_types_share_input_and_deps() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        std::fs::create_dir_all(&out).unwrap();
        write(
            dir.path(),
            "post.slang",
            "import tonemap;\n[shader(\"vertex\")]\nfloat4 vertMain() {}\n[shader(\"fragment\")]\nfloat4 fragMain() {}\n",
        );
        write(dir.path(), "tonemap.slang", "float3 map();\n");

        let script = generate(dir.path(), &out, &["post"], &["spv", "dxil"]);
        let own_lines: Vec<_> = build_lines(&script)
            .into_iter()
            .filter(|l| l.contains("post."))
            .collect();
        assert_eq!(own_lines.len(), 2);

        let strip_ext = |line: &str| {
            line.replace("post.spv", "post.OUT")
                .replace("post.dxil", "post.OUT")
        };
        assert_eq!(strip_ext(own_lines[0]), strip_ext(own_lines[1]));
    }

    #[test]
    fn zero_entry_module_with_deps_gets_intermediate_rule() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        std::fs::create_dir_all(&out).unwrap();
        write(dir.path(), "lib.slang", "import base;\n");
        write(dir.path(), "base.slang", "float3 f();\n");

        let script = generate(dir.path(), &out, &["lib"], &["spv"]);
        let lines = build_lines(&script);
        assert!(lines.iter().any(|l| l.starts_with("build lib.slang-module:")));
        assert!(lines.iter().any(|l| l.starts_with("build base.slang-module:")));
    }

    #[test]
    fn paths_relative_to_script_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        std::fs::create_dir_all(&out).unwrap();
        write(
            dir.path(),
            "a.slang",
            "[shader(\"compute\")]\nvoid main() {}\n",
        );

        let script = generate(dir.path(), &out, &["a"], &["spv"]);
        // Outputs live next to the script, so they are bare filenames.
        assert!(script.contains("build a.spv:"));
        assert!(!script.contains(&format!("build {}", out.display())));
    }

    #[test]
    fn rule_flags_accumulate() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        std::fs::create_dir_all(&out).unwrap();
        write(
            dir.path(),
            "a.slang",
            "[shader(\"compute\")]\nvoid main() {}\n",
        );

        let frontend = SourceFrontend::new(SessionOptions::new(vec![dir.path().to_path_buf()]));
        let script_path = out.join("build.ninja");
        let rule = RuleConfig {
            compiler: "slangc".to_string(),
            include_dirs: vec![PathBuf::from("lib/shaders")],
            defines: vec!["USE_SHADOWS=1".to_string()],
            extra_args: vec!["-O3".to_string(), "-warnings-as-errors".to_string()],
        };
        let mut planner = ScriptPlanner::new(&script_path, &out, vec!["spv".to_string()], rule);
        plan_modules(&frontend, &names(&["a"]), &mut planner, ScanPolicy::StopAtSeen).unwrap();

        let script = std::fs::read_to_string(&script_path).unwrap();
        assert!(script.contains("-I lib/shaders"));
        assert!(script.contains("-D USE_SHADOWS=1"));
        assert!(script.contains("-O3 -warnings-as-errors"));
    }
}
