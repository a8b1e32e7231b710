//! Local filesystem storage provider.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;

use glossvideo_core::error::{AppError, ErrorKind};
use glossvideo_core::result::AppResult;
use glossvideo_core::traits::storage::StorageProvider;

/// Local filesystem storage provider rooted at the writable folder.
#[derive(Debug, Clone)]
pub struct LocalStorageProvider {
    /// Root directory for all stored files.
    root: PathBuf,
}

impl LocalStorageProvider {
    /// Create a new local storage provider rooted at the given path.
    pub async fn new(root_path: impl AsRef<Path>) -> AppResult<Self> {
        let root = root_path.as_ref().to_path_buf();
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a relative path to an absolute path within the root.
    fn resolve(&self, path: &str) -> PathBuf {
        let clean = path.trim_start_matches('/');
        self.root.join(clean)
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl StorageProvider for LocalStorageProvider {
    fn provider_type(&self) -> &str {
        "local"
    }

    fn absolute_path(&self, path: &str) -> PathBuf {
        self.resolve(path)
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        let full_path = self.resolve(path);
        fs::try_exists(&full_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to stat path: {path}"),
                e,
            )
        })
    }

    async fn read_bytes(&self, path: &str) -> AppResult<Bytes> {
        let full_path = self.resolve(path);
        let data = fs::read(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("File not found: {path}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read file: {path}"),
                    e,
                )
            }
        })?;
        Ok(Bytes::from(data))
    }

    async fn write(&self, path: &str, data: Bytes) -> AppResult<()> {
        let full_path = self.resolve(path);
        self.ensure_parent(&full_path).await?;

        fs::write(&full_path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write file: {path}"),
                e,
            )
        })?;

        debug!(path, bytes = data.len(), "Wrote file");
        Ok(())
    }

    async fn import(&self, source: &Path, to: &str) -> AppResult<()> {
        let to_path = self.resolve(to);
        self.ensure_parent(&to_path).await?;

        if fs::rename(source, &to_path).await.is_err() {
            // Uploads may sit on another filesystem; fall back to copy + remove.
            fs::copy(source, &to_path).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to import {} -> {to}", source.display()),
                    e,
                )
            })?;
            fs::remove_file(source).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to remove imported upload {}", source.display()),
                    e,
                )
            })?;
        }

        debug!(source = %source.display(), to, "Imported file");
        Ok(())
    }

    async fn rename(&self, from: &str, to: &str) -> AppResult<()> {
        let from_path = self.resolve(from);
        let to_path = self.resolve(to);
        self.ensure_parent(&to_path).await?;

        fs::rename(&from_path, &to_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to rename {from} -> {to}"),
                e,
            )
        })?;

        debug!(from, to, "Renamed file");
        Ok(())
    }

    async fn rename_dir(&self, from: &str, to: &str) -> AppResult<()> {
        let from_path = self.resolve(from);
        let to_path = self.resolve(to);
        self.ensure_parent(&to_path).await?;

        fs::rename(&from_path, &to_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to rename directory {from} -> {to}"),
                e,
            )
        })?;

        debug!(from, to, "Renamed directory");
        Ok(())
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        let full_path = self.resolve(path);
        match fs::remove_file(&full_path).await {
            Ok(()) => {
                debug!(path, "Deleted file");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete file: {path}"),
                e,
            )),
        }
    }

    async fn create_dir(&self, path: &str) -> AppResult<()> {
        let full_path = self.resolve(path);
        fs::create_dir_all(&full_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create directory: {path}"),
                e,
            )
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_read_delete() {
        let dir = tempfile::tempdir().unwrap();
        let provider = LocalStorageProvider::new(dir.path()).await.unwrap();

        let data = Bytes::from("frame");
        provider
            .write("glossvideo/NGT/HO/HOUSE-1.mp4", data.clone())
            .await
            .unwrap();

        assert!(provider.exists("glossvideo/NGT/HO/HOUSE-1.mp4").await.unwrap());

        let read_back = provider
            .read_bytes("glossvideo/NGT/HO/HOUSE-1.mp4")
            .await
            .unwrap();
        assert_eq!(read_back, data);

        provider.delete("glossvideo/NGT/HO/HOUSE-1.mp4").await.unwrap();
        assert!(!provider.exists("glossvideo/NGT/HO/HOUSE-1.mp4").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let provider = LocalStorageProvider::new(dir.path()).await.unwrap();
        provider.delete("nothing/here.mp4").await.unwrap();
    }

    #[tokio::test]
    async fn test_rename_creates_destination_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let provider = LocalStorageProvider::new(dir.path()).await.unwrap();

        provider.write("a/A-1.mp4", Bytes::from("v")).await.unwrap();
        provider.rename("a/A-1.mp4", "b/c/A-1.mp4.bak").await.unwrap();

        assert!(!provider.exists("a/A-1.mp4").await.unwrap());
        assert!(provider.exists("b/c/A-1.mp4.bak").await.unwrap());
    }

    #[tokio::test]
    async fn test_import_moves_upload() {
        let upload_dir = tempfile::tempdir().unwrap();
        let upload = upload_dir.path().join("upload.mp4");
        std::fs::write(&upload, b"upload").unwrap();

        let dir = tempfile::tempdir().unwrap();
        let provider = LocalStorageProvider::new(dir.path()).await.unwrap();
        provider.import(&upload, "glossvideo/X/AB/AB-2.mp4").await.unwrap();

        assert!(!upload.exists());
        let bytes = provider.read_bytes("glossvideo/X/AB/AB-2.mp4").await.unwrap();
        assert_eq!(&bytes[..], b"upload");
    }

    #[tokio::test]
    async fn test_rename_dir() {
        let dir = tempfile::tempdir().unwrap();
        let provider = LocalStorageProvider::new(dir.path()).await.unwrap();

        provider.write("glossvideo/OLD/AB/AB-1.mp4", Bytes::from("v")).await.unwrap();
        provider.rename_dir("glossvideo/OLD", "glossvideo/NEW").await.unwrap();

        assert!(provider.exists("glossvideo/NEW/AB/AB-1.mp4").await.unwrap());
        assert!(!provider.exists("glossvideo/OLD").await.unwrap());
    }

    #[tokio::test]
    async fn test_absolute_path() {
        let dir = tempfile::tempdir().unwrap();
        let provider = LocalStorageProvider::new(dir.path()).await.unwrap();
        assert_eq!(
            provider.absolute_path("/glossvideo/A.mp4"),
            dir.path().join("glossvideo/A.mp4")
        );
    }
}
