//! The front-end trait seam and the module description it produces.

use std::path::{Path, PathBuf};

use shard_common::{ContentHash, Diagnostics};

use crate::error::FrontendError;

/// A loaded shader module as reported by the front end.
///
/// The dependency list is ordered: index 0 is the module's own source
/// file, subsequent indices are transitively included files in inclusion
/// order. The build engine holds a `ModuleInfo` only for the duration of
/// processing that one module.
#[derive(Debug, Clone)]
pub struct ModuleInfo {
    name: String,
    dependencies: Vec<PathBuf>,
    entry_points: Vec<String>,
}

impl ModuleInfo {
    /// Creates a module description. `dependencies[0]` must be the
    /// module's own source file.
    pub fn new(name: impl Into<String>, dependencies: Vec<PathBuf>, entry_points: Vec<String>) -> Self {
        Self {
            name: name.into(),
            dependencies,
            entry_points,
        }
    }

    /// The module name (source filename with the extension stripped).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of dependency files, including the module's own source.
    pub fn dependency_count(&self) -> usize {
        self.dependencies.len()
    }

    /// The dependency file path at the given index.
    pub fn dependency_path(&self, index: usize) -> &Path {
        &self.dependencies[index]
    }

    /// All dependency paths in front-end order.
    pub fn dependencies(&self) -> &[PathBuf] {
        &self.dependencies
    }

    /// Number of entry points defined in this module.
    pub fn entry_point_count(&self) -> usize {
        self.entry_points.len()
    }

    /// The names of the defined entry points.
    pub fn entry_points(&self) -> &[String] {
        &self.entry_points
    }
}

/// A shader front end: resolves module names to dependency lists and
/// composes modules into specializable programs.
///
/// Diagnostics text is accumulated into the passed sink for every
/// operation; the caller echoes it when non-empty regardless of the
/// operation's outcome.
pub trait Frontend {
    /// Loads a module by name, resolving its transitive dependency list
    /// and defined entry points.
    fn load_module(
        &self,
        name: &str,
        diag: &mut Diagnostics,
    ) -> Result<ModuleInfo, FrontendError>;

    /// Composes a module together with all of its entry points into a
    /// single specializable program.
    fn compose<'a>(
        &'a self,
        module: &ModuleInfo,
        diag: &mut Diagnostics,
    ) -> Result<Box<dyn ComposedProgram + 'a>, FrontendError>;
}

/// A composed (module + entry points) program, not yet linked.
pub trait ComposedProgram {
    /// Returns the identity digest of the program specialized to the
    /// given entry point and target. The digest changes if and only if
    /// the compiled output would change.
    fn entry_point_digest(&self, entry_index: usize, target_index: usize) -> ContentHash;

    /// Links the composed program.
    fn link<'a>(
        &'a self,
        diag: &mut Diagnostics,
    ) -> Result<Box<dyn LinkedProgram + 'a>, FrontendError>;
}

/// A linked program ready for target code extraction.
pub trait LinkedProgram {
    /// Extracts the compiled target code for the given target index.
    fn target_code(
        &self,
        target_index: usize,
        diag: &mut Diagnostics,
    ) -> Result<Vec<u8>, FrontendError>;
}

impl std::fmt::Debug for dyn LinkedProgram + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("LinkedProgram")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ModuleInfo {
        ModuleInfo::new(
            "forward",
            vec![
                PathBuf::from("shaders/forward.slang"),
                PathBuf::from("shaders/common.slangh"),
                PathBuf::from("shaders/lights.slang"),
            ],
            vec!["vertexMain".to_string(), "fragmentMain".to_string()],
        )
    }

    #[test]
    fn accessors() {
        let module = sample();
        assert_eq!(module.name(), "forward");
        assert_eq!(module.dependency_count(), 3);
        assert_eq!(module.entry_point_count(), 2);
        assert_eq!(
            module.dependency_path(0),
            Path::new("shaders/forward.slang")
        );
    }

    #[test]
    fn own_source_is_index_zero() {
        let module = sample();
        assert_eq!(module.dependencies()[0], module.dependency_path(0));
    }
}
