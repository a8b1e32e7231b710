//! Index of stored gloss videos and their history.
//!
//! The catalog is the authority on which (gloss, version) slots are taken.
//! Holding its write guard makes slot allocation a single step with
//! respect to every other catalog user.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use glossvideo_core::error::AppError;
use glossvideo_core::result::AppResult;
use glossvideo_core::types::{GlossId, VideoId};
use glossvideo_entity::{GlossVideo, GlossVideoHistory};

/// Catalog contents; every mutation keeps one video per (gloss, version).
#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    videos: BTreeMap<VideoId, GlossVideo>,
    history: Vec<GlossVideoHistory>,
}

impl CatalogState {
    /// Look up a video.
    pub fn get(&self, id: VideoId) -> AppResult<&GlossVideo> {
        self.videos
            .get(&id)
            .ok_or_else(|| AppError::not_found(format!("Gloss video {id} not found")))
    }

    /// All videos of a gloss, ordered by version.
    pub fn for_gloss(&self, gloss_id: GlossId) -> Vec<GlossVideo> {
        let mut videos: Vec<GlossVideo> = self
            .videos
            .values()
            .filter(|v| v.gloss_id == gloss_id)
            .cloned()
            .collect();
        videos.sort_by_key(|v| v.version);
        videos
    }

    /// The video holding a (gloss, version) slot.
    pub fn slot_holder(&self, gloss_id: GlossId, version: u32) -> Option<VideoId> {
        self.videos
            .values()
            .find(|v| v.gloss_id == gloss_id && v.version == version)
            .map(|v| v.id)
    }

    /// Whether a slot is free, ignoring `except` (the video about to take it).
    pub fn is_slot_free(&self, gloss_id: GlossId, version: u32, except: Option<VideoId>) -> bool {
        match self.slot_holder(gloss_id, version) {
            None => true,
            Some(holder) => Some(holder) == except,
        }
    }

    /// Add a new video.
    pub fn insert(&mut self, video: GlossVideo) -> AppResult<()> {
        if self.videos.contains_key(&video.id) {
            return Err(AppError::conflict(format!(
                "Gloss video {} already exists",
                video.id
            )));
        }
        if !self.is_slot_free(video.gloss_id, video.version, None) {
            return Err(AppError::conflict(format!(
                "Gloss {} already has a video at version {}",
                video.gloss_id, video.version
            )));
        }
        self.videos.insert(video.id, video);
        Ok(())
    }

    /// Persist changes to an existing video.
    pub fn update(&mut self, video: GlossVideo) -> AppResult<()> {
        if !self.videos.contains_key(&video.id) {
            return Err(AppError::not_found(format!(
                "Gloss video {} not found",
                video.id
            )));
        }
        if !self.is_slot_free(video.gloss_id, video.version, Some(video.id)) {
            return Err(AppError::conflict(format!(
                "Gloss {} already has a video at version {}",
                video.gloss_id, video.version
            )));
        }
        self.videos.insert(video.id, video);
        Ok(())
    }

    /// Remove a video record.
    pub fn remove(&mut self, id: VideoId) -> AppResult<GlossVideo> {
        self.videos
            .remove(&id)
            .ok_or_else(|| AppError::not_found(format!("Gloss video {id} not found")))
    }

    /// Append a history entry.
    pub fn record(&mut self, entry: GlossVideoHistory) {
        self.history.push(entry);
    }

    /// History of a gloss, oldest first.
    pub fn history(&self, gloss_id: GlossId) -> Vec<GlossVideoHistory> {
        self.history
            .iter()
            .filter(|h| h.gloss_id == gloss_id)
            .cloned()
            .collect()
    }

    /// Every video.
    pub fn videos(&self) -> impl Iterator<Item = &GlossVideo> {
        self.videos.values()
    }

    /// Every history entry.
    pub fn all_history(&self) -> &[GlossVideoHistory] {
        &self.history
    }
}

/// Shared, lock-protected video catalog.
#[derive(Debug, Clone, Default)]
pub struct VideoCatalog {
    inner: Arc<RwLock<CatalogState>>,
}

impl VideoCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire shared access.
    pub async fn read(&self) -> RwLockReadGuard<'_, CatalogState> {
        self.inner.read().await
    }

    /// Acquire exclusive access for a multi-step change.
    pub async fn write(&self) -> RwLockWriteGuard<'_, CatalogState> {
        self.inner.write().await
    }

    /// Look up a video.
    pub async fn get(&self, id: VideoId) -> AppResult<GlossVideo> {
        self.read().await.get(id).cloned()
    }

    /// All videos of a gloss, ordered by version.
    pub async fn for_gloss(&self, gloss_id: GlossId) -> Vec<GlossVideo> {
        self.read().await.for_gloss(gloss_id)
    }

    /// The displayed video of a gloss.
    pub async fn active(&self, gloss_id: GlossId) -> Option<GlossVideo> {
        let state = self.read().await;
        state
            .slot_holder(gloss_id, 0)
            .and_then(|id| state.get(id).ok().cloned())
    }

    /// Every video ordered by gloss and version.
    pub async fn all(&self) -> Vec<GlossVideo> {
        let mut videos: Vec<GlossVideo> = self.read().await.videos().cloned().collect();
        videos.sort_by_key(|v| (v.gloss_id, v.version));
        videos
    }

    /// History of a gloss, oldest first.
    pub async fn history(&self, gloss_id: GlossId) -> Vec<GlossVideoHistory> {
        self.read().await.history(gloss_id)
    }

    /// Replace the whole catalog, validating the slot invariant.
    pub async fn replace(
        &self,
        videos: Vec<GlossVideo>,
        history: Vec<GlossVideoHistory>,
    ) -> AppResult<()> {
        let mut fresh = CatalogState::default();
        for video in videos {
            fresh.insert(video)?;
        }
        fresh.history = history;
        *self.write().await = fresh;
        Ok(())
    }
}
