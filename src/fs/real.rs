use std::path::Path;

use async_trait::async_trait;

use super::FileAccess;
use crate::error::FileAccessError;

/// Real filesystem backing: `std::fs` for the sync call sites, `tokio::fs`
/// for the async ones.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

fn access_error(path: &Path, err: std::io::Error) -> FileAccessError {
    if err.kind() == std::io::ErrorKind::NotFound {
        FileAccessError::NotFound(path.to_path_buf())
    } else {
        FileAccessError::Io {
            path: path.to_path_buf(),
            source: err,
        }
    }
}

#[async_trait]
impl FileAccess for RealFs {
    fn read_text(&self, path: &Path) -> Result<String, FileAccessError> {
        std::fs::read_to_string(path).map_err(|err| access_error(path, err))
    }

    fn exists(&self, path: &Path) -> Result<bool, FileAccessError> {
        path.try_exists().map_err(|err| access_error(path, err))
    }

    async fn read_text_async(&self, path: &Path) -> Result<String, FileAccessError> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|err| access_error(path, err))
    }

    async fn exists_async(&self, path: &Path) -> Result<bool, FileAccessError> {
        tokio::fs::try_exists(path)
            .await
            .map_err(|err| access_error(path, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_existing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("Contract.sol");
        std::fs::write(&path, "pragma solidity ^0.8.0;").unwrap();

        let fs = RealFs;
        assert_eq!(fs.read_text(&path).unwrap(), "pragma solidity ^0.8.0;");
        assert!(fs.exists(&path).unwrap());
    }

    #[test]
    fn test_read_missing_file_is_not_found() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("Missing.sol");

        let fs = RealFs;
        assert!(!fs.exists(&path).unwrap());
        match fs.read_text(&path) {
            Err(FileAccessError::NotFound(p)) => assert_eq!(p, path),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_async_variants_match_sync() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("Contract.sol");
        std::fs::write(&path, "contract A {}").unwrap();

        let fs = RealFs;
        assert_eq!(fs.read_text_async(&path).await.unwrap(), "contract A {}");
        assert!(fs.exists_async(&path).await.unwrap());

        let missing = dir.path().join("Missing.sol");
        assert!(!fs.exists_async(&missing).await.unwrap());
        assert!(matches!(
            fs.read_text_async(&missing).await,
            Err(FileAccessError::NotFound(_))
        ));
    }
}
