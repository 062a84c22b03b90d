use std::path::Path;

use async_trait::async_trait;

use crate::error::FileAccessError;

pub mod memory;
pub mod real;

pub use memory::MemoryFs;
pub use real::RealFs;

/// Capability interface for the file access the resolver needs: reading
/// source text and checking existence. The core never touches a concrete
/// storage backend directly, so an in-memory file set and the real
/// filesystem are interchangeable.
///
/// Each method has a synchronous and an asynchronous call site; a build
/// uses one or the other throughout, selected by the caller's `sync` flag.
/// The async variants default to delegating to the sync ones and must
/// surface the same errors.
#[async_trait]
pub trait FileAccess: Send + Sync {
    /// Read the full text of a file.
    fn read_text(&self, path: &Path) -> Result<String, FileAccessError>;

    /// Check whether a file exists.
    fn exists(&self, path: &Path) -> Result<bool, FileAccessError>;

    /// Async variant of [`read_text`](Self::read_text).
    async fn read_text_async(&self, path: &Path) -> Result<String, FileAccessError> {
        self.read_text(path)
    }

    /// Async variant of [`exists`](Self::exists).
    async fn exists_async(&self, path: &Path) -> Result<bool, FileAccessError> {
        self.exists(path)
    }
}
