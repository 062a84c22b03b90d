use std::path::PathBuf;

use thiserror::Error;

/// Failure surfaced by the file-access capability.
#[derive(Debug, Error)]
pub enum FileAccessError {
    /// The requested file does not exist.
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// A read or existence check failed for a reason other than absence.
    #[error("io error on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors produced while extracting, resolving, or rewriting imports.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// An `import` keyword opened a statement but no quoted path followed.
    /// Aborts processing of the whole file.
    #[error("import statement has no quoted path: {statement}")]
    ImportSyntax { statement: String },

    /// Every resolution tier was exhausted without finding an existing file.
    #[error("could not resolve import {import_path:?} from {importing_file}: {cause}")]
    UnresolvedImport {
        import_path: String,
        importing_file: String,
        cause: String,
    },

    /// A read or existence check failed in the file-access capability.
    #[error("file access failed: {0}")]
    FileAccess(#[from] FileAccessError),

    /// No recognizable version pragma in the source. The graph builder
    /// suppresses this; standalone pragma callers see it directly.
    #[error("no version pragma found")]
    PragmaNotFound,

    /// Internal consistency guard. Indicates a bug, not a recoverable condition.
    #[error("invariant violated: {0}")]
    Invariant(String),
}
