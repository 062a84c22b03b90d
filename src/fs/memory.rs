use std::collections::HashMap;
use std::path::Path;

use super::FileAccess;
use crate::error::FileAccessError;

/// In-memory file set backing. Keys are forward-slash absolute paths, the
/// same spelling module ids use, so lookups line up with resolver output.
///
/// Backs the CLI's `files` input and most tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryFs {
    files: HashMap<String, String>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_files<I, K, V>(files: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let files = files
            .into_iter()
            .map(|(path, content)| (normalize_key(&path.into()), content.into()))
            .collect();
        MemoryFs { files }
    }

    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files.insert(normalize_key(&path.into()), content.into());
    }

    fn lookup(&self, path: &Path) -> Option<&String> {
        self.files.get(&normalize_key(&path.to_string_lossy()))
    }
}

fn normalize_key(path: &str) -> String {
    path.replace('\\', "/")
}

impl FileAccess for MemoryFs {
    fn read_text(&self, path: &Path) -> Result<String, FileAccessError> {
        self.lookup(path)
            .cloned()
            .ok_or_else(|| FileAccessError::NotFound(path.to_path_buf()))
    }

    fn exists(&self, path: &Path) -> Result<bool, FileAccessError> {
        Ok(self.lookup(path).is_some())
    }
}
