use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ResolveError;
use crate::extractor::extract_imports;
use crate::fs::FileAccess;

/// Ordered remapping table: (prefix, target) pairs in caller-declared order.
///
/// Backed by a vector, never a hash map: several prefixes can match the same
/// import path, and resolution must pick the first declared one
/// deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Remappings(Vec<(String, String)>);

impl Remappings {
    pub fn new(entries: Vec<(String, String)>) -> Self {
        Remappings(entries)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, String)> {
        self.0.iter()
    }

    /// Apply the first entry whose prefix is a literal textual prefix of
    /// `import_path`. Later matching entries are never consulted.
    pub fn apply(&self, import_path: &str) -> Option<String> {
        self.0.iter().find_map(|(prefix, target)| {
            import_path
                .strip_prefix(prefix.as_str())
                .map(|rest| format!("{}{}", target, rest))
        })
    }
}

impl FromIterator<(String, String)> for Remappings {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Remappings(iter.into_iter().collect())
    }
}

/// A resolved import: the original path text plus its canonical identity.
///
/// `updated` mirrors `absolute`; the wire contract reports both.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedImport {
    pub original: String,
    pub absolute: String,
    pub updated: String,
}

/// Canonical module identity for a path: lexically normalized (`.` and `..`
/// resolved without touching the filesystem) with `/` separators, so the
/// same logical file gets the same id on every platform.
pub fn module_id(path: &Path) -> String {
    normalize_path(path).to_string_lossy().replace('\\', "/")
}

/// Resolve `.` and `..` components lexically.
fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                if components
                    .last()
                    .is_some_and(|c| matches!(c, Component::Normal(_)))
                {
                    components.pop();
                } else {
                    components.push(component);
                }
            }
            Component::CurDir => {}
            other => components.push(other),
        }
    }
    components.iter().collect()
}

/// The ordered candidate ids for one raw import, one per matching tier:
/// remapping, relative, each library root, node_modules fallback. The first
/// candidate that exists wins; a candidate that is absent falls through to
/// the next tier instead of failing.
fn candidate_ids(
    importing_file: &str,
    raw_path: &str,
    remappings: &Remappings,
    libs: &[PathBuf],
) -> Vec<String> {
    let base_dir = Path::new(importing_file)
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("/"));

    let mut candidates = Vec::new();

    if let Some(remapped) = remappings.apply(raw_path) {
        candidates.push(absolute_id(Path::new(&remapped), &base_dir));
    }

    if raw_path.starts_with('.') {
        candidates.push(absolute_id(&base_dir.join(raw_path), &base_dir));
    }

    for root in libs {
        candidates.push(absolute_id(&root.join(raw_path), &base_dir));
    }

    candidates.push(absolute_id(
        &base_dir.join("node_modules").join(raw_path),
        &base_dir,
    ));

    candidates
}

/// Canonical id for a candidate. Non-absolute candidates (a relative
/// remapping target or library root) are interpreted against the importing
/// file's directory.
fn absolute_id(candidate: &Path, base_dir: &Path) -> String {
    if candidate.is_absolute() {
        module_id(candidate)
    } else {
        module_id(&base_dir.join(candidate))
    }
}

fn unresolved(importing_file: &str, raw_path: &str, candidates: &[String]) -> ResolveError {
    ResolveError::UnresolvedImport {
        import_path: raw_path.to_string(),
        importing_file: importing_file.to_string(),
        cause: format!(
            "no existing file among candidates [{}]",
            candidates.join(", ")
        ),
    }
}

/// Resolve one raw import path, relative to its declaring file, to a
/// canonical absolute id. Tiers in strict precedence order: remapping table,
/// relative import, library roots, node_modules fallback. The first tier
/// that matches and whose candidate exists wins.
pub fn resolve_import(
    importing_file: &str,
    raw_path: &str,
    remappings: &Remappings,
    libs: &[PathBuf],
    fs: &dyn FileAccess,
) -> Result<String, ResolveError> {
    let candidates = candidate_ids(importing_file, raw_path, remappings, libs);
    for candidate in &candidates {
        if fs.exists(Path::new(candidate))? {
            return Ok(candidate.clone());
        }
    }
    Err(unresolved(importing_file, raw_path, &candidates))
}

/// Async twin of [`resolve_import`]; suspends only at existence checks.
pub async fn resolve_import_async(
    importing_file: &str,
    raw_path: &str,
    remappings: &Remappings,
    libs: &[PathBuf],
    fs: &dyn FileAccess,
) -> Result<String, ResolveError> {
    let candidates = candidate_ids(importing_file, raw_path, remappings, libs);
    for candidate in &candidates {
        if fs.exists_async(Path::new(candidate)).await? {
            return Ok(candidate.clone());
        }
    }
    Err(unresolved(importing_file, raw_path, &candidates))
}

/// Extract and resolve every import of one source file, in appearance order
/// with duplicates preserved.
pub fn resolve_imports(
    importing_file: &str,
    code: &str,
    remappings: &Remappings,
    libs: &[PathBuf],
    fs: &dyn FileAccess,
) -> Result<Vec<ResolvedImport>, ResolveError> {
    let mut resolved = Vec::new();
    for raw in extract_imports(code)? {
        let absolute = resolve_import(importing_file, &raw.path, remappings, libs, fs)?;
        resolved.push(ResolvedImport {
            original: raw.path,
            updated: absolute.clone(),
            absolute,
        });
    }
    Ok(resolved)
}

/// Async twin of [`resolve_imports`].
pub async fn resolve_imports_async(
    importing_file: &str,
    code: &str,
    remappings: &Remappings,
    libs: &[PathBuf],
    fs: &dyn FileAccess,
) -> Result<Vec<ResolvedImport>, ResolveError> {
    let mut resolved = Vec::new();
    for raw in extract_imports(code)? {
        let absolute =
            resolve_import_async(importing_file, &raw.path, remappings, libs, fs).await?;
        resolved.push(ResolvedImport {
            original: raw.path,
            updated: absolute.clone(),
            absolute,
        });
    }
    Ok(resolved)
}
