use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::ResolveError;
use crate::fs::FileAccess;
use crate::resolver::{
    module_id, resolve_imports, resolve_imports_async, Remappings, ResolvedImport,
};
use crate::rewriter::{update_import_paths, update_pragma};

use super::{Module, ModuleGraph};

/// Builds the module graph for the transitive import closure of a root file.
///
/// The traversal is an explicit LIFO work list, never recursion: the graph
/// only grows, so a cyclic import terminates the moment its closing edge
/// targets an id that is already inserted. Any extraction, resolution, or
/// read failure aborts the whole build; there is no partial graph.
pub struct ModuleGraphBuilder<'a> {
    fs: &'a dyn FileAccess,
    remappings: Remappings,
    libs: Vec<PathBuf>,
    target_version: Option<String>,
}

impl<'a> ModuleGraphBuilder<'a> {
    pub fn new(fs: &'a dyn FileAccess) -> Self {
        ModuleGraphBuilder {
            fs,
            remappings: Remappings::default(),
            libs: Vec::new(),
            target_version: None,
        }
    }

    pub fn with_remappings(mut self, remappings: Remappings) -> Self {
        self.remappings = remappings;
        self
    }

    pub fn with_libs(mut self, libs: Vec<PathBuf>) -> Self {
        self.libs = libs;
        self
    }

    /// Normalize pragmas to `>=<version>` instead of keeping each module's
    /// declared version.
    pub fn with_target_version(mut self, version: impl Into<String>) -> Self {
        self.target_version = Some(version.into());
        self
    }

    /// Build the graph synchronously from the root file's path and text.
    pub fn build(&self, root_path: &str, root_source: &str) -> Result<ModuleGraph, ResolveError> {
        let root_id = module_id(Path::new(root_path));
        let mut graph = ModuleGraph::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut work = vec![(root_id.clone(), root_source.to_string())];
        seen.insert(root_id);

        while let Some((id, source)) = work.pop() {
            // A second queued copy of an id is discarded.
            if graph.contains(&id) {
                continue;
            }

            let resolved = resolve_imports(&id, &source, &self.remappings, &self.libs, self.fs)?;
            let module = self.assemble(id, source, &resolved)?;
            let imports = module.imported_ids.clone();
            graph.insert(module)?;

            for import_id in imports {
                // Membership check before the read: a diamond-shaped graph
                // reads each shared dependency once.
                if seen.insert(import_id.clone()) {
                    let dep_source = self.fs.read_text(Path::new(&import_id))?;
                    work.push((import_id, dep_source));
                }
            }
        }

        Ok(graph)
    }

    /// Async twin of [`build`](Self::build); suspends only at the
    /// file-access boundary.
    pub async fn build_async(
        &self,
        root_path: &str,
        root_source: &str,
    ) -> Result<ModuleGraph, ResolveError> {
        let root_id = module_id(Path::new(root_path));
        let mut graph = ModuleGraph::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut work = vec![(root_id.clone(), root_source.to_string())];
        seen.insert(root_id);

        while let Some((id, source)) = work.pop() {
            if graph.contains(&id) {
                continue;
            }

            let resolved =
                resolve_imports_async(&id, &source, &self.remappings, &self.libs, self.fs).await?;
            let module = self.assemble(id, source, &resolved)?;
            let imports = module.imported_ids.clone();
            graph.insert(module)?;

            for import_id in imports {
                if seen.insert(import_id.clone()) {
                    let dep_source = self.fs.read_text_async(Path::new(&import_id)).await?;
                    work.push((import_id, dep_source));
                }
            }
        }

        Ok(graph)
    }

    fn assemble(
        &self,
        id: String,
        raw_code: String,
        resolved: &[ResolvedImport],
    ) -> Result<Module, ResolveError> {
        let substituted = update_import_paths(&raw_code, resolved);
        // A module without a pragma keeps its import-substituted text.
        let code = match update_pragma(&substituted, self.target_version.as_deref()) {
            Ok(code) => code,
            Err(ResolveError::PragmaNotFound) => substituted,
            Err(other) => return Err(other),
        };

        Ok(Module {
            imported_ids: resolved.iter().map(|r| r.absolute.clone()).collect(),
            id,
            raw_code,
            code,
        })
    }
}
