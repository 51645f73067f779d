//! Local filesystem sink.
//!
//! Writes the export into a directory, replacing any previous file of the
//! same name atomically.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::storage::ExportSink;

/// Local filesystem export sink.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(path)
    }
}

#[async_trait]
impl ExportSink for LocalStorage {
    async fn deliver(&self, file_name: &str, bytes: &[u8]) -> Result<String> {
        let path = self.write_bytes(file_name, bytes).await?;
        log::info!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_deliver_writes_file() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        let location = storage.deliver("ddr-export.json", b"{}").await.unwrap();
        assert!(location.ends_with("ddr-export.json"));

        let written = tokio::fs::read(tmp.path().join("ddr-export.json")).await.unwrap();
        assert_eq!(written, b"{}");
        assert!(!tmp.path().join("ddr-export.tmp").exists());
    }

    #[tokio::test]
    async fn test_deliver_overwrites_previous_export() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        storage.deliver("out.json", b"first").await.unwrap();
        storage.deliver("out.json", b"second").await.unwrap();

        let written = tokio::fs::read(tmp.path().join("out.json")).await.unwrap();
        assert_eq!(written, b"second");
    }

    #[tokio::test]
    async fn test_deliver_creates_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path().join("nested/exports"));

        storage.deliver("out.json", b"[]").await.unwrap();
        assert!(tmp.path().join("nested/exports/out.json").exists());
    }
}
