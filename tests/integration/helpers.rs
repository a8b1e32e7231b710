//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;

use glossvideo_core::config::AppConfig;
use glossvideo_core::traits::{FrameExtractor, StorageProvider, ToolError, VideoResizer};
use glossvideo_core::types::{DatasetId, GlossId};
use glossvideo_entity::{Dataset, Gloss};
use glossvideo_service::{ActorContext, MediaStore};
use glossvideo_storage::LocalStorageProvider;
use glossvideo_storage::paths::small_variant_path;

/// Dataset registered by [`TestApp::seeded`].
pub const DATASET: DatasetId = DatasetId(1);

/// Gloss registered by [`TestApp::seeded`], idgloss `HUIS` (nl) / `HOUSE` (en).
pub const GLOSS: GlossId = GlossId(10);

/// Frame extractor writing a small marker file instead of an image.
#[derive(Debug)]
pub struct FakeExtractor;

#[async_trait]
impl FrameExtractor for FakeExtractor {
    async fn extract_frame(&self, video: &Path, output: &Path) -> Result<(), ToolError> {
        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = tokio::fs::read(video).await?;
        tokio::fs::write(output, [b"poster:".as_slice(), &content].concat()).await?;
        Ok(())
    }
}

/// Resizer copying each video to its `_small` path.
#[derive(Debug)]
pub struct FakeResizer;

#[async_trait]
impl VideoResizer for FakeResizer {
    async fn resize(
        &self,
        videos: &[PathBuf],
        _width: u32,
        _height: u32,
        _bitrate: u32,
    ) -> Result<Vec<PathBuf>, ToolError> {
        let mut written = Vec::new();
        for video in videos {
            let output = PathBuf::from(small_variant_path(&video.to_string_lossy()));
            tokio::fs::copy(video, &output).await?;
            written.push(output);
        }
        Ok(written)
    }
}

/// Media tools that are not installed.
#[derive(Debug)]
pub struct MissingTool;

#[async_trait]
impl FrameExtractor for MissingTool {
    async fn extract_frame(&self, _video: &Path, _output: &Path) -> Result<(), ToolError> {
        Err(ToolError::CommandNotFound("ffmpeg".into()))
    }
}

#[async_trait]
impl VideoResizer for MissingTool {
    async fn resize(
        &self,
        _videos: &[PathBuf],
        _width: u32,
        _height: u32,
        _bitrate: u32,
    ) -> Result<Vec<PathBuf>, ToolError> {
        Err(ToolError::CommandNotFound("ffmpeg".into()))
    }
}

/// Test application context
pub struct TestApp {
    /// Temporary directory holding the media root and uploads
    pub dir: TempDir,
    /// Configuration the store was built from
    pub config: AppConfig,
    /// The wired services
    pub store: MediaStore,
    /// Acting user
    pub ctx: ActorContext,
}

impl TestApp {
    /// Create a store over a fresh directory with working fake tools
    pub async fn new() -> Self {
        Self::build(Arc::new(FakeExtractor), Arc::new(FakeResizer)).await
    }

    /// Create a store whose media tools always fail
    pub async fn with_missing_tools() -> Self {
        Self::build(Arc::new(MissingTool), Arc::new(MissingTool)).await
    }

    /// Create a store with dataset `NGT` (default language `nl`) and one gloss
    pub async fn seeded() -> Self {
        let app = Self::new().await;
        app.seed().await;
        app
    }

    async fn build(extractor: Arc<dyn FrameExtractor>, resizer: Arc<dyn VideoResizer>) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut config = AppConfig::default();
        config.storage.writable_folder = dir.path().join("media").to_string_lossy().to_string();

        let storage: Arc<dyn StorageProvider> = Arc::new(
            LocalStorageProvider::new(&config.storage.writable_folder)
                .await
                .expect("Failed to init storage"),
        );
        let store = MediaStore::new(&config, storage, extractor, resizer);

        Self {
            dir,
            config,
            store,
            ctx: ActorContext::new("tester"),
        }
    }

    /// Register the standard dataset and gloss
    pub async fn seed(&self) {
        self.store
            .registry
            .add_dataset(Dataset::new(DATASET, "NGT", "nl"))
            .await
            .expect("Failed to add dataset");
        self.store
            .registry
            .add_gloss(
                Gloss::new(GLOSS, DATASET)
                    .with_translation("nl", "HUIS")
                    .with_translation("en", "HOUSE"),
            )
            .await
            .expect("Failed to add gloss");
    }

    /// Write a file to upload, outside the media root
    pub async fn upload_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join("uploads").join(name);
        tokio::fs::create_dir_all(path.parent().expect("upload dir"))
            .await
            .expect("Failed to create upload dir");
        tokio::fs::write(&path, content)
            .await
            .expect("Failed to write upload");
        path
    }

    /// Upload `content` as the new active video of the standard gloss
    pub async fn upload(&self, name: &str, content: &str) -> glossvideo_entity::GlossVideo {
        let path = self.upload_file(name, content).await;
        self.store
            .versions
            .rotate_in(&self.ctx, GLOSS, &path)
            .await
            .expect("Upload failed")
    }

    /// Whether a file exists under the media root
    pub async fn exists(&self, path: &str) -> bool {
        self.store.storage.exists(path).await.expect("stat failed")
    }

    /// Read a file under the media root as text
    pub async fn read(&self, path: &str) -> String {
        let bytes = self.store.storage.read_bytes(path).await.expect("read failed");
        String::from_utf8_lossy(&bytes).to_string()
    }

    /// Put a file directly under the media root
    pub async fn put(&self, path: &str, content: &str) {
        self.store
            .storage
            .write(path, content.to_string().into())
            .await
            .expect("write failed");
    }
}
