//! Shared input handling for both subcommands.

use std::path::{Path, PathBuf};

/// Module names and session search paths derived from CLI file arguments.
pub struct ModuleInputs {
    /// Module names (file stems) in command-line order.
    pub names: Vec<String>,
    /// Parent directories of the given files, deduplicated, in order.
    pub search_paths: Vec<PathBuf>,
}

/// Derives module names and search paths from the shader file arguments.
///
/// Directory arguments are skipped. Each file's parent directory joins
/// the search paths; a bare filename contributes the current directory.
pub fn collect_modules(shader_files: &[String]) -> ModuleInputs {
    let mut names = Vec::new();
    let mut search_paths: Vec<PathBuf> = Vec::new();

    for file in shader_files {
        let path = Path::new(file);
        if path.is_dir() {
            continue;
        }

        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !search_paths.contains(&parent) {
            search_paths.push(parent);
        }

        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            names.push(stem.to_string());
        }
    }

    ModuleInputs {
        names,
        search_paths,
    }
}
