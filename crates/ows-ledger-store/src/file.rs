//! File-backed ledger store.
//!
//! Layout: `<root>/<compact(genesis hash)>/ledger`. Each project gets its own
//! directory, created on first write.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use ows_ledger_core::ChangeSetHash;

use crate::error::{Result, StoreError};
use crate::traits::LedgerStore;

/// File name of the persisted ledger inside a project directory.
pub const LEDGER_FILE_NAME: &str = "ledger";

const TMP_SUFFIX: &str = "tmp";

/// Stores each project's ledger as a single file under a root directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root`. Nothing is touched on disk yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The directory holding one project's files.
    pub fn project_dir(&self, genesis: &ChangeSetHash) -> PathBuf {
        self.root.join(genesis.to_compact())
    }

    fn path(&self, genesis: &ChangeSetHash) -> PathBuf {
        self.project_dir(genesis).join(LEDGER_FILE_NAME)
    }
}

/// Create `dir` if it is missing. Anything else at that path is an error.
async fn ensure_dir(dir: &Path) -> Result<()> {
    match tokio::fs::metadata(dir).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(StoreError::InvalidPath(format!(
            "{} exists and is not a directory",
            dir.display()
        ))),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(tokio::fs::create_dir_all(dir).await?),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl LedgerStore for FileStore {
    async fn read(&self, genesis: &ChangeSetHash) -> Result<Option<Vec<u8>>> {
        let path = self.path(genesis);
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                tracing::debug!(path = %path.display(), len = bytes.len(), "read ledger");
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, genesis: &ChangeSetHash, bytes: &[u8]) -> Result<()> {
        let dir = self.project_dir(genesis);
        ensure_dir(self.root()).await?;
        ensure_dir(&dir).await?;

        // Write aside, then rename over the old file.
        let path = dir.join(LEDGER_FILE_NAME);
        let tmp = path.with_extension(TMP_SUFFIX);
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;

        tracing::debug!(path = %path.display(), len = bytes.len(), "wrote ledger");
        Ok(())
    }

    fn ledger_path(&self, genesis: &ChangeSetHash) -> Option<PathBuf> {
        Some(self.path(genesis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn genesis() -> ChangeSetHash {
        ChangeSetHash::digest(b"genesis")
    }

    #[tokio::test]
    async fn test_read_missing_is_none() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        assert_eq!(store.read(&genesis()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        store.write(&genesis(), b"first").await.unwrap();
        store.write(&genesis(), b"second").await.unwrap();

        assert_eq!(store.read(&genesis()).await.unwrap(), Some(b"second".to_vec()));
    }

    #[tokio::test]
    async fn test_layout_is_content_addressed() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        let hash = genesis();

        store.write(&hash, b"bytes").await.unwrap();

        let expected = dir.path().join(hash.to_compact()).join("ledger");
        assert_eq!(store.ledger_path(&hash), Some(expected.clone()));
        assert_eq!(std::fs::read(&expected).unwrap(), b"bytes");
        assert!(!expected.with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn test_projects_are_separate() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        let other = ChangeSetHash::digest(b"other");

        store.write(&genesis(), b"one").await.unwrap();

        assert_eq!(store.read(&other).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_root_that_is_a_file_is_invalid() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let store = FileStore::new(&blocker);

        let result = store.write(&genesis(), b"bytes").await;

        assert!(matches!(result, Err(StoreError::InvalidPath(_))));
        assert_eq!(std::fs::read(&blocker).unwrap(), b"not a directory");
    }

    #[tokio::test]
    async fn test_project_dir_that_is_a_file_is_invalid() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("nested"));
        std::fs::create_dir_all(store.root()).unwrap();
        std::fs::write(store.project_dir(&genesis()), b"squatter").unwrap();

        let result = store.write(&genesis(), b"bytes").await;

        assert!(matches!(result, Err(StoreError::InvalidPath(_))));
        assert_eq!(store.read(&genesis()).await.ok().flatten(), None);
    }

    #[tokio::test]
    async fn test_missing_root_is_created() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("a").join("b"));

        store.write(&genesis(), b"bytes").await.unwrap();

        assert!(store.root().is_dir());
        assert_eq!(store.read(&genesis()).await.unwrap(), Some(b"bytes".to_vec()));
    }
}
