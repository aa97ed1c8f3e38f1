//! Per-module dependency scanning and classification.

use std::path::{Path, PathBuf};

use shard_frontend::{ModuleInfo, HEADER_EXT};

use crate::seen::SeenSet;

/// The kind of a dependency edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DepKind {
    /// A header-only include. Never becomes a build target.
    Header,
    /// A compiled module that must itself be brought up to date.
    Module,
}

/// One classified dependency of a module.
#[derive(Clone, Debug)]
pub struct DepEdge {
    /// Index of this entry in the module's dependency list.
    pub index: usize,
    /// The dependency source file path.
    pub path: PathBuf,
    /// Header or compiled module.
    pub kind: DepKind,
}

/// A walker output entry: the edge plus whether it should produce a
/// build edge. Headers are recorded but never emitted.
#[derive(Clone, Debug)]
pub struct WalkedDep {
    /// The classified edge.
    pub edge: DepEdge,
    /// `true` if the edge should produce a build target.
    pub emit: bool,
}

/// How the walker treats a dependency already present in the [`SeenSet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ScanPolicy {
    /// Stop scanning the module's remaining dependencies at the first
    /// already-seen entry. Fast, and the default, but entries after the
    /// seen one are not reached.
    #[default]
    StopAtSeen,
    /// Skip only the already-seen entry and continue scanning.
    SkipSeen,
}

/// The result of walking one module's dependency list.
#[derive(Debug, Default)]
pub struct ModuleWalk {
    /// Classified dependencies in front-end index order.
    pub deps: Vec<WalkedDep>,
    /// Index at which the scan stopped early under
    /// [`ScanPolicy::StopAtSeen`], if it did.
    pub stopped_at: Option<usize>,
}

impl ModuleWalk {
    /// Iterates the edges that should produce build targets.
    pub fn emitted(&self) -> impl Iterator<Item = &DepEdge> {
        self.deps.iter().filter(|d| d.emit).map(|d| &d.edge)
    }
}

/// Classifies a dependency path by its file extension.
pub fn classify(path: &Path) -> DepKind {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext == HEADER_EXT => DepKind::Header,
        _ => DepKind::Module,
    }
}

/// Walks a module's dependency list, classifying and deduplicating.
///
/// Scanning starts at index 1: index 0 is the module's own source, which
/// the caller has already recorded. Every first-seen entry is inserted
/// into `seen`; headers are recorded but carry `emit = false`. Entries
/// already in `seen` are handled per `policy`. Output order matches the
/// front end's index order, which fixes the left-to-right order of
/// prerequisites in emitted build rules.
pub fn walk_module(module: &ModuleInfo, seen: &mut SeenSet, policy: ScanPolicy) -> ModuleWalk {
    let mut walk = ModuleWalk::default();

    for index in 1..module.dependency_count() {
        let path = module.dependency_path(index);

        if seen.contains(path) {
            match policy {
                ScanPolicy::StopAtSeen => {
                    walk.stopped_at = Some(index);
                    break;
                }
                ScanPolicy::SkipSeen => continue,
            }
        }
        seen.insert(path);

        let kind = classify(path);
        walk.deps.push(WalkedDep {
            emit: kind == DepKind::Module,
            edge: DepEdge {
                index,
                path: path.to_path_buf(),
                kind,
            },
        });
    }

    walk
}
