use std::collections::HashMap;

use serde::Serialize;

use crate::error::ResolveError;

pub mod builder;

pub use builder::ModuleGraphBuilder;

/// A single resolved source file: its canonical id, original and rewritten
/// text, and the ids of the files it imports.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    /// Canonical absolute id of the file, forward-slash normalized.
    pub id: String,
    /// Original text as read.
    pub raw_code: String,
    /// Text after import-path substitution and pragma normalization.
    pub code: String,
    /// Resolved dependency ids in declaration order. May contain duplicates
    /// when a file imports the same path twice.
    pub imported_ids: Vec<String>,
}

/// Id-keyed map of every module reachable from a build root.
///
/// A given id is inserted at most once per build and never mutated or
/// removed afterwards; each builder invocation produces a fresh graph.
#[derive(Debug, Default, Serialize)]
pub struct ModuleGraph {
    #[serde(flatten)]
    modules: HashMap<String, Module>,
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.modules.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Module> {
        self.modules.get(id)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Module)> {
        self.modules.iter()
    }

    pub(crate) fn insert(&mut self, module: Module) -> Result<(), ResolveError> {
        if self.modules.contains_key(&module.id) {
            return Err(ResolveError::Invariant(format!(
                "module {} inserted twice",
                module.id
            )));
        }
        self.modules.insert(module.id.clone(), module);
        Ok(())
    }
}
