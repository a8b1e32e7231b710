//! Version rotation: uploads push existing videos into `.bak` slots and
//! reverts bring them back.
//!
//! Slot allocation, file renames and record updates for one gloss all
//! happen under the catalog write guard. Renames are not transactional
//! with the record update; a crash between the two leaves a file whose
//! name disagrees with its record.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use glossvideo_core::config::media::MediaConfig;
use glossvideo_core::error::AppError;
use glossvideo_core::events::GlossEvent;
use glossvideo_core::result::AppResult;
use glossvideo_core::traits::StorageProvider;
use glossvideo_core::types::{GlossId, VideoId};
use glossvideo_entity::{ArtifactKind, GlossVideo, GlossVideoHistory, VideoAction};
use glossvideo_storage::MediaLayout;
use glossvideo_storage::paths::{add_backup_marker, strip_backup_marker};

use crate::catalog::{CatalogState, VideoCatalog};
use crate::context::ActorContext;
use crate::events::EventBus;
use crate::registry::GlossRegistry;
use crate::video::artifacts::ArtifactService;

/// What a revert did to a video.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", content = "video", rename_all = "snake_case")]
pub enum RevertOutcome {
    /// The backup moved one slot closer to active.
    Reverted(GlossVideo),
    /// The active video was removed with its files.
    Deleted(GlossVideo),
}

impl RevertOutcome {
    /// The affected video as it ended up.
    pub fn video(&self) -> &GlossVideo {
        match self {
            Self::Reverted(video) | Self::Deleted(video) => video,
        }
    }
}

/// Places uploads and maintains the backup chain of each gloss.
#[derive(Debug, Clone)]
pub struct VersionService {
    /// Path derivation.
    layout: MediaLayout,
    /// Media root.
    storage: Arc<dyn StorageProvider>,
    /// Owners of videos.
    registry: GlossRegistry,
    /// Video index.
    catalog: VideoCatalog,
    /// Poster and preview handling.
    artifacts: ArtifactService,
    /// Event publication.
    events: EventBus,
    /// Extract a poster right after upload.
    poster_on_upload: bool,
    /// Encode a preview right after upload.
    small_on_upload: bool,
}

impl VersionService {
    /// Creates a new version service.
    pub fn new(
        layout: MediaLayout,
        storage: Arc<dyn StorageProvider>,
        registry: GlossRegistry,
        catalog: VideoCatalog,
        artifacts: ArtifactService,
        events: EventBus,
        media: &MediaConfig,
    ) -> Self {
        Self {
            layout,
            storage,
            registry,
            catalog,
            artifacts,
            events,
            poster_on_upload: media.generate_poster_on_upload,
            small_on_upload: media.generate_small_on_upload,
        }
    }

    /// Store `upload` as the active video of a gloss, rotating every
    /// existing video of the gloss one backup slot up.
    pub async fn rotate_in(
        &self,
        ctx: &ActorContext,
        gloss_id: GlossId,
        upload: &Path,
    ) -> AppResult<GlossVideo> {
        if !tokio::fs::try_exists(upload).await? {
            return Err(AppError::not_found(format!(
                "Upload file not found: {}",
                upload.display()
            )));
        }
        let owner = self.registry.owner(gloss_id).await?;
        let target = self.layout.video_file_path(&owner, 0);

        let mut state = self.catalog.write().await;

        // Highest version first, so every target slot has already been vacated.
        for video in state.for_gloss(gloss_id).into_iter().rev() {
            self.shift_up(&mut state, video).await?;
        }

        if self.storage.exists(&target).await? {
            self.move_stray_aside(&state, &target).await?;
        }

        self.storage.import(upload, &target).await?;
        let video = GlossVideo::new(gloss_id, target.clone());
        state.insert(video.clone())?;
        state.record(GlossVideoHistory::new(
            VideoAction::Upload,
            gloss_id,
            &ctx.actor,
            Some(upload.display().to_string()),
            Some(self.storage.absolute_path(&target).display().to_string()),
        ));
        drop(state);

        info!(
            video_id = %video.id,
            gloss_id = %gloss_id,
            path = %target,
            actor = %ctx.actor,
            "Video uploaded"
        );

        let video = if self.poster_on_upload || self.small_on_upload {
            self.artifacts
                .regenerate(video.id, self.poster_on_upload, self.small_on_upload)
                .await?
        } else {
            video
        };

        self.events.publish(
            Some(ctx.actor.clone()),
            GlossEvent::VideoUploaded {
                video_id: video.id,
                gloss_id,
                path: target,
            },
        );
        Ok(video)
    }

    /// Move one video to the next free backup slot.
    ///
    /// A slot is free when no record of the gloss holds it and nothing
    /// sits at its path on disk; each occupied slot adds a marker.
    async fn shift_up(&self, state: &mut CatalogState, mut video: GlossVideo) -> AppResult<()> {
        let mut version = video.version + 1;
        let mut path = add_backup_marker(&video.videofile);
        while !state.is_slot_free(video.gloss_id, version, Some(video.id))
            || self.storage.exists(&path).await?
        {
            version += 1;
            path = add_backup_marker(&path);
        }

        if self.storage.exists(&video.videofile).await? {
            self.storage.rename(&video.videofile, &path).await?;
        } else {
            warn!(video_id = %video.id, path = %video.videofile, "Video file missing during rotation");
        }

        self.artifacts.discard(&mut video, ArtifactKind::Poster).await;
        self.artifacts.discard(&mut video, ArtifactKind::Small).await;

        debug!(
            video_id = %video.id,
            from = %video.videofile,
            to = %path,
            version,
            "Video rotated to backup slot"
        );
        video.videofile = path;
        video.version = version;
        video.touch();
        state.update(video)
    }

    /// Rename an untracked file occupying a video path out of the way.
    async fn move_stray_aside(&self, state: &CatalogState, target: &str) -> AppResult<()> {
        let mut path = add_backup_marker(target);
        while self.storage.exists(&path).await? || state.videos().any(|v| v.videofile == path) {
            path = add_backup_marker(&path);
        }
        warn!(from = %target, to = %path, "Untracked file at active video path moved aside");
        self.storage.rename(target, &path).await
    }

    /// Revert one video: a backup moves one slot closer to active, the
    /// active video is deleted.
    pub async fn revert(&self, ctx: &ActorContext, id: VideoId) -> AppResult<RevertOutcome> {
        let mut state = self.catalog.write().await;
        let outcome = self.revert_locked(&mut state, ctx, id).await?;
        drop(state);
        self.announce(ctx, &outcome);
        Ok(outcome)
    }

    /// Undo the last upload of a gloss: the active video is deleted and
    /// every backup moves down to the lowest free slot, so the newest
    /// backup becomes active even when the chain has gaps. Returns the new
    /// active video.
    pub async fn restore_previous(
        &self,
        ctx: &ActorContext,
        gloss_id: GlossId,
    ) -> AppResult<Option<GlossVideo>> {
        let mut state = self.catalog.write().await;
        let videos = state.for_gloss(gloss_id);
        if videos.is_empty() {
            return Err(AppError::not_found(format!(
                "Gloss {gloss_id} has no videos"
            )));
        }
        let (active, backups): (Vec<GlossVideo>, Vec<GlossVideo>) =
            videos.into_iter().partition(GlossVideo::is_active);

        // A broken chain must fail before the active video is deleted.
        for (slot, video) in (0u32..).zip(&backups) {
            strip_backup_markers(&video.videofile, video.version - slot)?;
        }

        let mut outcomes = Vec::with_capacity(active.len() + backups.len());
        for video in active {
            let deleted = self.delete_locked(&mut state, ctx, video.id).await?;
            outcomes.push(RevertOutcome::Deleted(deleted));
        }
        for (slot, video) in (0u32..).zip(backups) {
            let moved = self.move_down(&mut state, video, slot).await?;
            outcomes.push(RevertOutcome::Reverted(moved));
        }
        let active = state
            .slot_holder(gloss_id, 0)
            .and_then(|id| state.get(id).ok().cloned());
        drop(state);

        for outcome in &outcomes {
            self.announce(ctx, outcome);
        }
        info!(gloss_id = %gloss_id, actor = %ctx.actor, "Previous video restored");
        Ok(active)
    }

    /// Delete a video and its files whatever its version.
    pub async fn delete_video(&self, ctx: &ActorContext, id: VideoId) -> AppResult<GlossVideo> {
        let mut state = self.catalog.write().await;
        let video = self.delete_locked(&mut state, ctx, id).await?;
        drop(state);
        self.announce(ctx, &RevertOutcome::Deleted(video.clone()));
        Ok(video)
    }

    async fn revert_locked(
        &self,
        state: &mut CatalogState,
        ctx: &ActorContext,
        id: VideoId,
    ) -> AppResult<RevertOutcome> {
        let video = state.get(id)?.clone();
        if video.is_active() {
            return self
                .delete_locked(state, ctx, id)
                .await
                .map(RevertOutcome::Deleted);
        }
        let version = video.version - 1;
        self.move_down(state, video, version)
            .await
            .map(RevertOutcome::Reverted)
    }

    /// Move a backup to a lower version, dropping one marker per slot.
    /// An untracked file at the target path is moved aside first.
    async fn move_down(
        &self,
        state: &mut CatalogState,
        mut video: GlossVideo,
        version: u32,
    ) -> AppResult<GlossVideo> {
        let id = video.id;
        let target = strip_backup_markers(&video.videofile, video.version - version)?;
        if !state.is_slot_free(video.gloss_id, version, Some(id)) {
            return Err(AppError::conflict(format!(
                "Gloss {} already has a video at version {version}",
                video.gloss_id
            )));
        }
        if state.videos().any(|v| v.id != id && v.videofile == target) {
            return Err(AppError::conflict(format!(
                "Path '{target}' belongs to another video"
            )));
        }

        if self.storage.exists(&video.videofile).await? {
            if self.storage.exists(&target).await? {
                self.move_stray_aside(state, &target).await?;
            }
            self.storage.rename(&video.videofile, &target).await?;
        } else {
            warn!(video_id = %id, path = %video.videofile, "Video file missing during revert");
        }

        // Artifacts of both the old and the new path are stale now.
        self.artifacts.discard(&mut video, ArtifactKind::Poster).await;
        self.artifacts.discard(&mut video, ArtifactKind::Small).await;
        let from = std::mem::replace(&mut video.videofile, target);
        self.artifacts.discard(&mut video, ArtifactKind::Poster).await;
        self.artifacts.discard(&mut video, ArtifactKind::Small).await;

        debug!(video_id = %id, from = %from, to = %video.videofile, version, "Video reverted");
        video.version = version;
        video.touch();
        state.update(video.clone())?;
        Ok(video)
    }

    async fn delete_locked(
        &self,
        state: &mut CatalogState,
        ctx: &ActorContext,
        id: VideoId,
    ) -> AppResult<GlossVideo> {
        let video = state.get(id)?.clone();
        self.artifacts.delete_files(&video).await;
        state.remove(id)?;
        state.record(GlossVideoHistory::new(
            VideoAction::Delete,
            video.gloss_id,
            &ctx.actor,
            None,
            Some(self.storage.absolute_path(&video.videofile).display().to_string()),
        ));
        info!(
            video_id = %id,
            gloss_id = %video.gloss_id,
            path = %video.videofile,
            actor = %ctx.actor,
            "Video deleted"
        );
        Ok(video)
    }

    fn announce(&self, ctx: &ActorContext, outcome: &RevertOutcome) {
        let payload = match outcome {
            RevertOutcome::Reverted(video) => GlossEvent::VideoReverted {
                video_id: video.id,
                gloss_id: video.gloss_id,
                version: video.version,
            },
            RevertOutcome::Deleted(video) => GlossEvent::VideoDeleted {
                video_id: video.id,
                gloss_id: video.gloss_id,
            },
        };
        self.events.publish(Some(ctx.actor.clone()), payload);
    }
}

/// Remove `count` backup markers from a stored path.
fn strip_backup_markers(path: &str, count: u32) -> AppResult<String> {
    let mut stripped = path.to_string();
    for _ in 0..count {
        stripped = strip_backup_marker(&stripped)?;
    }
    Ok(stripped)
}
