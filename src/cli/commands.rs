use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::fs::{FileAccess, MemoryFs, RealFs};
use crate::graph::{ModuleGraph, ModuleGraphBuilder};
use crate::resolver::{self, Remappings, ResolvedImport};

use super::output::format_json;
use super::OutputFormat;

/// Request shape for `resolve-imports`.
///
/// `remappings` arrives as a JSON object; serde_json's preserve_order
/// feature keeps the caller's declaration order, which the ordered
/// remapping table depends on.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveImportsRequest {
    pub absolute_path: String,
    pub code: String,
    #[serde(default)]
    pub remappings: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub libs: Vec<String>,
    #[serde(default = "default_sync")]
    pub sync: bool,
}

/// Request shape for `module-factory`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleFactoryRequest {
    pub absolute_path: String,
    pub raw_code: String,
    #[serde(default)]
    pub remappings: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub libs: Vec<String>,
    #[serde(default = "default_sync")]
    pub sync: bool,
    /// Optional in-memory file set. When present it backs the build instead
    /// of the real filesystem.
    #[serde(default)]
    pub files: Option<HashMap<String, String>>,
    /// Optional target version for pragma normalization.
    #[serde(default)]
    pub solc_version: Option<String>,
}

fn default_sync() -> bool {
    true
}

/// Resolve a single file's imports against the real filesystem.
pub fn run_resolve_imports(req: ResolveImportsRequest, format: &OutputFormat) -> Result<String> {
    let remappings = remappings_from_json(&req.remappings)?;
    let libs = lib_paths(&req.libs);
    let fs = RealFs;

    let resolved: Vec<ResolvedImport> = if req.sync {
        resolver::resolve_imports(&req.absolute_path, &req.code, &remappings, &libs, &fs)?
    } else {
        block_on(resolver::resolve_imports_async(
            &req.absolute_path,
            &req.code,
            &remappings,
            &libs,
            &fs,
        ))??
    };

    Ok(format_json(&resolved, format))
}

/// Build the full module graph from a root file.
pub fn run_module_factory(req: ModuleFactoryRequest, format: &OutputFormat) -> Result<String> {
    let remappings = remappings_from_json(&req.remappings)?;
    let libs = lib_paths(&req.libs);

    let graph = match &req.files {
        Some(files) => {
            let fs = MemoryFs::from_files(files.iter().map(|(p, c)| (p.clone(), c.clone())));
            build_graph(&req, &fs, remappings, libs)?
        }
        None => build_graph(&req, &RealFs, remappings, libs)?,
    };

    Ok(format_json(&graph, format))
}

fn build_graph(
    req: &ModuleFactoryRequest,
    fs: &dyn FileAccess,
    remappings: Remappings,
    libs: Vec<PathBuf>,
) -> Result<ModuleGraph> {
    let mut builder = ModuleGraphBuilder::new(fs)
        .with_remappings(remappings)
        .with_libs(libs);
    if let Some(version) = &req.solc_version {
        builder = builder.with_target_version(version.clone());
    }

    let graph = if req.sync {
        builder.build(&req.absolute_path, &req.raw_code)?
    } else {
        block_on(builder.build_async(&req.absolute_path, &req.raw_code))??
    };
    Ok(graph)
}

fn remappings_from_json(map: &serde_json::Map<String, serde_json::Value>) -> Result<Remappings> {
    let mut entries = Vec::with_capacity(map.len());
    for (prefix, target) in map {
        let target = target
            .as_str()
            .with_context(|| format!("remapping target for {:?} must be a string", prefix))?;
        entries.push((prefix.clone(), target.to_string()));
    }
    Ok(Remappings::new(entries))
}

fn lib_paths(libs: &[String]) -> Vec<PathBuf> {
    libs.iter().map(PathBuf::from).collect()
}

/// Drive an async build to completion on a current-thread runtime. The
/// traversal itself is single-threaded; only file access suspends.
fn block_on<F: std::future::Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    Ok(runtime.block_on(future))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory_request(json: serde_json::Value) -> ModuleFactoryRequest {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_module_factory_with_in_memory_files() {
        let req = factory_request(serde_json::json!({
            "absolutePath": "/project/Main.sol",
            "rawCode": "pragma solidity ^0.8.0;\nimport \"./A.sol\";\ncontract Main {}\n",
            "files": {
                "/project/A.sol": "pragma solidity ^0.8.0;\ncontract A {}\n"
            }
        }));

        let output = run_module_factory(req, &OutputFormat::Compact).unwrap();
        let graph: serde_json::Value = serde_json::from_str(&output).unwrap();

        let main = &graph["/project/Main.sol"];
        assert_eq!(main["id"], "/project/Main.sol");
        assert_eq!(main["importedIds"][0], "/project/A.sol");
        assert!(main["rawCode"].as_str().unwrap().contains("./A.sol"));
        assert!(main["code"].as_str().unwrap().contains("/project/A.sol"));
        assert!(graph.get("/project/A.sol").is_some());
    }

    #[test]
    fn test_module_factory_async_mode() {
        let req = factory_request(serde_json::json!({
            "absolutePath": "/project/Main.sol",
            "rawCode": "import \"./A.sol\";\ncontract Main {}\n",
            "sync": false,
            "files": {
                "/project/A.sol": "contract A {}\n"
            }
        }));

        let output = run_module_factory(req, &OutputFormat::Compact).unwrap();
        let graph: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!(graph.get("/project/A.sol").is_some());
    }

    #[test]
    fn test_remapping_order_survives_json() {
        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(
            r#"{"z/": "/first/", "a/": "/second/"}"#,
        )
        .unwrap();
        let remappings = remappings_from_json(&map).unwrap();
        let entries: Vec<_> = remappings.iter().cloned().collect();
        assert_eq!(
            entries,
            vec![
                ("z/".to_string(), "/first/".to_string()),
                ("a/".to_string(), "/second/".to_string()),
            ]
        );
    }

    #[test]
    fn test_non_string_remapping_target_is_rejected() {
        let map: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(r#"{"a/": 5}"#).unwrap();
        assert!(remappings_from_json(&map).is_err());
    }

    #[test]
    fn test_missing_import_surfaces_as_error() {
        let req = factory_request(serde_json::json!({
            "absolutePath": "/project/Main.sol",
            "rawCode": "import \"./Missing.sol\";\ncontract Main {}\n",
            "files": {}
        }));

        let err = run_module_factory(req, &OutputFormat::Compact).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("./Missing.sol"));
        assert!(message.contains("/project/Main.sol"));
    }
}
