//! Wiring of the standard gloss video services.

use std::sync::Arc;

use tracing::info;

use glossvideo_core::config::AppConfig;
use glossvideo_core::result::AppResult;
use glossvideo_core::traits::{FrameExtractor, StorageProvider, VideoResizer};
use glossvideo_storage::{
    FfmpegFrameExtractor, FfmpegVideoResizer, LocalStorageProvider, MediaLayout,
};

use crate::catalog::VideoCatalog;
use crate::events::{EventBus, EventHandler};
use crate::registry::GlossRegistry;
use crate::snapshot::StateSnapshot;
use crate::video::{ArtifactService, RelocationService, VersionService};

/// All services sharing one registry, catalog, storage root and event bus.
#[derive(Debug, Clone)]
pub struct MediaStore {
    /// Path derivation.
    pub layout: MediaLayout,
    /// Media root.
    pub storage: Arc<dyn StorageProvider>,
    /// Datasets and glosses.
    pub registry: GlossRegistry,
    /// Video index.
    pub catalog: VideoCatalog,
    /// Event publication.
    pub events: EventBus,
    /// Poster and preview handling.
    pub artifacts: ArtifactService,
    /// Upload rotation and reverts.
    pub versions: VersionService,
    /// Path maintenance.
    pub relocation: RelocationService,
    /// Snapshot location relative to the storage root.
    state_file: String,
}

impl MediaStore {
    /// Wire services around explicit collaborators.
    pub fn new(
        config: &AppConfig,
        storage: Arc<dyn StorageProvider>,
        extractor: Arc<dyn FrameExtractor>,
        resizer: Arc<dyn VideoResizer>,
    ) -> Self {
        let layout = MediaLayout::from_config(&config.storage);
        let registry = GlossRegistry::new();
        let catalog = VideoCatalog::new();
        let events = EventBus::default();

        let artifacts = ArtifactService::new(
            layout.clone(),
            storage.clone(),
            extractor,
            resizer,
            catalog.clone(),
            config.media.small_video_width,
        );
        let versions = VersionService::new(
            layout.clone(),
            storage.clone(),
            registry.clone(),
            catalog.clone(),
            artifacts.clone(),
            events.clone(),
            &config.media,
        );
        let relocation = RelocationService::new(
            layout.clone(),
            storage.clone(),
            registry.clone(),
            catalog.clone(),
            events.clone(),
        );

        Self {
            layout,
            storage,
            registry,
            catalog,
            events,
            artifacts,
            versions,
            relocation,
            state_file: config.storage.state_file.clone(),
        }
    }

    /// Wire services over the local writable folder and ffmpeg.
    pub async fn open(config: &AppConfig) -> AppResult<Self> {
        let storage = LocalStorageProvider::new(&config.storage.writable_folder).await?;
        info!(
            root = %storage.root().display(),
            ffmpeg = %config.media.ffmpeg_program,
            "Media store opened"
        );
        Ok(Self::new(
            config,
            Arc::new(storage),
            Arc::new(FfmpegFrameExtractor::new(&config.media)),
            Arc::new(FfmpegVideoResizer::new(&config.media)),
        ))
    }

    /// A handler applying metadata change events to this store.
    pub fn event_handler(&self) -> EventHandler {
        EventHandler::new(self.relocation.clone())
    }

    /// Replace the in-memory state with the saved snapshot, if any.
    pub async fn load_state(&self) -> AppResult<()> {
        StateSnapshot::load(self.storage.as_ref(), &self.state_file)
            .await?
            .restore_into(&self.registry, &self.catalog)
            .await
    }

    /// Persist the in-memory state.
    pub async fn save_state(&self) -> AppResult<()> {
        StateSnapshot::capture(&self.registry, &self.catalog)
            .await
            .save(self.storage.as_ref(), &self.state_file)
            .await
    }
}
