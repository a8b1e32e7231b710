//! Storage provider trait for the media root.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Trait for the filesystem backend holding videos and images.
///
/// All `path` arguments are relative to the provider root, using `/` as
/// separator, exactly as they are stored on video records.
#[async_trait]
pub trait StorageProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local").
    fn provider_type(&self) -> &str;

    /// Resolve a relative path to an absolute path, for external tools.
    fn absolute_path(&self, path: &str) -> PathBuf;

    /// Check whether a file or directory exists at the given path.
    async fn exists(&self, path: &str) -> AppResult<bool>;

    /// Read a file into memory.
    async fn read_bytes(&self, path: &str) -> AppResult<Bytes>;

    /// Write bytes to a file, creating parent directories.
    async fn write(&self, path: &str, data: Bytes) -> AppResult<()>;

    /// Move a file from outside the root (an upload) into storage.
    async fn import(&self, source: &Path, to: &str) -> AppResult<()>;

    /// Rename a file within the root, creating destination directories.
    async fn rename(&self, from: &str, to: &str) -> AppResult<()>;

    /// Rename a directory within the root.
    async fn rename_dir(&self, from: &str, to: &str) -> AppResult<()>;

    /// Delete a file. Deleting a missing file is not an error.
    async fn delete(&self, path: &str) -> AppResult<()>;

    /// Create a directory (and any missing parents).
    async fn create_dir(&self, path: &str) -> AppResult<()>;
}
