//! The direct back end: recompile stale artifacts in-process.

use std::path::Path;

use shard_cache::DigestStore;
use shard_common::Diagnostics;
use shard_frontend::{Frontend, ModuleInfo};
use shard_graph::ModuleWalk;

use crate::error::EmitError;
use crate::planner::{ArtifactPlanner, ModuleAction};
use crate::BINARY_EXT;

/// Compiles stale modules in-process, consulting the digest cache.
///
/// Per module: compose with all entry points, digest the composed
/// program, and compare against the persisted digest. On a match nothing
/// else happens; otherwise the program is linked, target code extracted,
/// and both the artifact and the refreshed digest are written. The
/// digest of entry point 0 stands in for the whole module in this path.
pub struct DirectPlanner {
    store: DigestStore,
}

impl DirectPlanner {
    /// Creates a direct planner writing artifacts to `output_dir`.
    pub fn new(output_dir: &Path) -> Self {
        Self {
            store: DigestStore::new(output_dir),
        }
    }

    /// The underlying digest store.
    pub fn store(&self) -> &DigestStore {
        &self.store
    }
}

impl ArtifactPlanner for DirectPlanner {
    fn begin(&mut self) -> Result<(), EmitError> {
        self.store.ensure_dir()?;
        Ok(())
    }

    fn plan_module(
        &mut self,
        frontend: &dyn Frontend,
        module: &ModuleInfo,
        _walk: &ModuleWalk,
        diag: &mut Diagnostics,
    ) -> Result<ModuleAction, EmitError> {
        // Only modules that define entry points are compiled in this mode.
        if module.entry_point_count() == 0 {
            return Ok(ModuleAction::Skipped);
        }

        let composed = frontend.compose(module, diag)?;
        let digest = composed.entry_point_digest(0, 0);

        if self.store.is_up_to_date(module.name(), &digest) {
            return Ok(ModuleAction::UpToDate);
        }

        let linked = composed.link(diag)?;
        let code = linked.target_code(0, diag)?;

        self.store.write_artifact(module.name(), BINARY_EXT, &code)?;
        self.store.write_digest(module.name(), &digest)?;

        Ok(ModuleAction::Rebuilt)
    }

    fn finish(&mut self) -> Result<(), EmitError> {
        Ok(())
    }
}
