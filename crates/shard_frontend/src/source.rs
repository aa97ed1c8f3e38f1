//! The built-in source-scanning front end.
//!
//! Resolves a module's transitive dependency list by scanning shader
//! source text for `import` and `#include` directives, and counts entry
//! points marked with `[shader("...")]` attributes. Composed programs are
//! digested over every dependency file's content plus the digest-relevant
//! session options, so any change along the dependency chain changes the
//! digest. Target code is a deterministic module package; a native
//! compiler back end implements the same traits to produce real target
//! output.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use shard_common::hash::HashBuilder;
use shard_common::{ContentHash, Diagnostics};

use crate::error::FrontendError;
use crate::module::{ComposedProgram, Frontend, LinkedProgram, ModuleInfo};
use crate::options::SessionOptions;
use crate::MODULE_EXT;

/// Magic bytes identifying a packaged module program.
const PACKAGE_MAGIC: [u8; 4] = *b"SHRD";

/// Package format version. Increment on breaking changes.
const PACKAGE_FORMAT_VERSION: u32 = 1;

/// A front end that derives dependency and entry-point information
/// directly from shader source text.
pub struct SourceFrontend {
    options: SessionOptions,
}

/// A directive found while scanning a source file.
#[derive(Debug, PartialEq, Eq)]
enum Directive {
    /// `import name;` — references another compiled module.
    Import(String),
    /// `#include "file"` — references a file by (possibly relative) path.
    Include(String),
}

impl SourceFrontend {
    /// Creates a front end with the given session options.
    pub fn new(options: SessionOptions) -> Self {
        Self { options }
    }

    /// The session options this front end was created with.
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Resolves a module name to a source file via the search paths.
    fn resolve_module(&self, name: &str) -> Option<PathBuf> {
        let filename = format!("{name}.{MODULE_EXT}");
        self.options
            .search_paths
            .iter()
            .map(|dir| dir.join(&filename))
            .find(|candidate| candidate.is_file())
    }

    /// Resolves an `#include` reference relative to the including file,
    /// falling back to the search paths.
    fn resolve_include(&self, reference: &str, including: &Path) -> Option<PathBuf> {
        if let Some(dir) = including.parent() {
            let candidate = dir.join(reference);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        self.options
            .search_paths
            .iter()
            .map(|dir| dir.join(reference))
            .find(|candidate| candidate.is_file())
    }

    /// Recursively collects the transitive dependency list of `path` in
    /// inclusion order. `visited` spans the whole module so shared
    /// includes appear once, at their first inclusion point.
    fn collect_dependencies(
        &self,
        path: &Path,
        visited: &mut HashSet<PathBuf>,
        deps: &mut Vec<PathBuf>,
        diag: &mut Diagnostics,
    ) -> Result<(), FrontendError> {
        let content = read_source(path)?;

        for directive in scan_directives(&content) {
            let resolved = match &directive {
                Directive::Import(name) => self.resolve_module(name),
                Directive::Include(reference) => self.resolve_include(reference, path),
            };
            let Some(resolved) = resolved else {
                let reference = match directive {
                    Directive::Import(name) => name,
                    Directive::Include(reference) => reference,
                };
                diag.emit(format!(
                    "error: cannot resolve '{}' referenced from {}",
                    reference,
                    path.display()
                ));
                return Err(FrontendError::UnresolvedReference {
                    path: path.to_path_buf(),
                    reference,
                });
            };

            if visited.insert(resolved.clone()) {
                deps.push(resolved.clone());
                self.collect_dependencies(&resolved, visited, deps, diag)?;
            }
        }

        Ok(())
    }
}

impl Frontend for SourceFrontend {
    fn load_module(
        &self,
        name: &str,
        diag: &mut Diagnostics,
    ) -> Result<ModuleInfo, FrontendError> {
        let Some(source) = self.resolve_module(name) else {
            diag.emit(format!(
                "error: module '{name}' not found (searched {} path(s))",
                self.options.search_paths.len()
            ));
            return Err(FrontendError::ModuleNotFound {
                name: name.to_string(),
            });
        };

        let mut visited = HashSet::new();
        visited.insert(source.clone());
        let mut deps = vec![source.clone()];
        self.collect_dependencies(&source, &mut visited, &mut deps, diag)?;

        let content = read_source(&source)?;
        let entry_points = scan_entry_points(&content);

        Ok(ModuleInfo::new(name, deps, entry_points))
    }

    fn compose<'a>(
        &'a self,
        module: &ModuleInfo,
        _diag: &mut Diagnostics,
    ) -> Result<Box<dyn ComposedProgram + 'a>, FrontendError> {
        let mut sources = Vec::with_capacity(module.dependency_count());
        for path in module.dependencies() {
            let content = std::fs::read(path).map_err(|e| FrontendError::Io {
                path: path.clone(),
                source: e,
            })?;
            sources.push(content);
        }

        Ok(Box::new(ComposedSourceProgram {
            module_name: module.name().to_string(),
            entry_points: module.entry_points().to_vec(),
            sources,
            options: &self.options,
        }))
    }
}

/// A composed program held as the raw contents of every dependency file.
struct ComposedSourceProgram<'a> {
    module_name: String,
    entry_points: Vec<String>,
    sources: Vec<Vec<u8>>,
    options: &'a SessionOptions,
}

impl ComposedSourceProgram<'_> {
    /// Digest over every digest-relevant compilation input.
    fn program_digest(&self, entry_tag: &[u8], target_index: usize) -> ContentHash {
        let mut builder = HashBuilder::new();
        for source in &self.sources {
            builder.update(source);
        }
        builder.update(entry_tag);
        builder.update(&(target_index as u64).to_le_bytes());
        self.options.mix_into(&mut builder);
        builder.finish()
    }
}

impl ComposedProgram for ComposedSourceProgram<'_> {
    fn entry_point_digest(&self, entry_index: usize, target_index: usize) -> ContentHash {
        let tag = self
            .entry_points
            .get(entry_index)
            .map(|name| name.as_bytes().to_vec())
            .unwrap_or_else(|| entry_index.to_le_bytes().to_vec());
        self.program_digest(&tag, target_index)
    }

    fn link<'a>(
        &'a self,
        diag: &mut Diagnostics,
    ) -> Result<Box<dyn LinkedProgram + 'a>, FrontendError> {
        let mut seen = HashSet::new();
        for entry in &self.entry_points {
            if !seen.insert(entry.as_str()) {
                diag.emit(format!(
                    "error: duplicate entry point '{}' in module '{}'",
                    entry, self.module_name
                ));
                return Err(FrontendError::Link {
                    module: self.module_name.clone(),
                    reason: format!("duplicate entry point '{entry}'"),
                });
            }
        }
        Ok(Box::new(LinkedSourceProgram { composed: self }))
    }
}

/// A linked program; target code is the deterministic module package.
struct LinkedSourceProgram<'a> {
    composed: &'a ComposedSourceProgram<'a>,
}

impl LinkedProgram for LinkedSourceProgram<'_> {
    fn target_code(
        &self,
        target_index: usize,
        _diag: &mut Diagnostics,
    ) -> Result<Vec<u8>, FrontendError> {
        if target_index != 0 {
            return Err(FrontendError::TargetOutOfRange {
                index: target_index,
                count: 1,
            });
        }

        let digest = self.composed.program_digest(b"linked", target_index);

        // Package layout: magic, format version, entry count, program
        // digest, then each entry point name length-prefixed.
        let mut out = Vec::new();
        out.extend_from_slice(&PACKAGE_MAGIC);
        out.extend_from_slice(&PACKAGE_FORMAT_VERSION.to_le_bytes());
        out.extend_from_slice(&(self.composed.entry_points.len() as u32).to_le_bytes());
        out.extend_from_slice(digest.as_bytes());
        for entry in &self.composed.entry_points {
            out.extend_from_slice(&(entry.len() as u32).to_le_bytes());
            out.extend_from_slice(entry.as_bytes());
        }
        Ok(out)
    }
}

fn read_source(path: &Path) -> Result<String, FrontendError> {
    std::fs::read_to_string(path).map_err(|e| FrontendError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Scans source text for `import` and `#include` directives, in order.
fn scan_directives(content: &str) -> Vec<Directive> {
    let mut directives = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("import ") {
            if let Some(name) = rest.trim().strip_suffix(';') {
                directives.push(Directive::Import(name.trim().to_string()));
            }
        } else if let Some(rest) = line.strip_prefix("#include") {
            let rest = rest.trim();
            if let Some(reference) = unquote(rest) {
                directives.push(Directive::Include(reference.to_string()));
            }
        }
    }
    directives
}

/// Extracts the contents of a double-quoted string, if `s` is one.
fn unquote(s: &str) -> Option<&str> {
    let s = s.strip_prefix('"')?;
    let end = s.find('"')?;
    Some(&s[..end])
}

/// Scans source text for `[shader("...")]`-attributed entry points.
///
/// The entry point name is the identifier immediately before the opening
/// parenthesis of the declaration following the attribute.
fn scan_entry_points(content: &str) -> Vec<String> {
    let mut entries = Vec::new();
    let mut pending_attr = false;

    for line in content.lines() {
        let line = line.trim();
        if line.starts_with("[shader(") {
            pending_attr = true;
            continue;
        }
        if pending_attr {
            if let Some(name) = declaration_name(line) {
                entries.push(name.to_string());
                pending_attr = false;
            } else if !line.is_empty() && !line.starts_with('[') {
                // Declaration line without a recognizable name; fall back
                // to a positional tag so the entry is still counted.
                entries.push(format!("entry{}", entries.len()));
                pending_attr = false;
            }
        }
    }
    entries
}

/// Returns the identifier preceding the first `(` on a declaration line.
fn declaration_name(line: &str) -> Option<&str> {
    let paren = line.find('(')?;
    let head = &line[..paren];
    let name = head.rsplit(|c: char| c.is_whitespace()).next()?;
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}
