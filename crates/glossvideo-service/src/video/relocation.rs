//! Relocation of stored videos after their owner's naming changed.
//!
//! Video paths are derived from the dataset acronym and the gloss
//! display name. When either changes, each dependent record gets its
//! new canonical path; files follow either one by one or, for an acronym
//! change, by renaming the dataset's top-level directories.

use std::sync::Arc;

use tracing::{debug, info, warn};

use glossvideo_core::error::AppError;
use glossvideo_core::events::GlossEvent;
use glossvideo_core::result::AppResult;
use glossvideo_core::traits::StorageProvider;
use glossvideo_core::types::{DatasetId, GlossId, VideoId};
use glossvideo_entity::{ArtifactKind, GlossVideo, GlossVideoHistory, VideoAction, VideoOwner};
use glossvideo_storage::MediaLayout;
use glossvideo_storage::paths::small_variant_path;

use crate::catalog::{CatalogState, VideoCatalog};
use crate::context::ActorContext;
use crate::events::EventBus;
use crate::registry::GlossRegistry;

/// A completed path change of one video.
#[derive(Debug, Clone)]
struct Move {
    video: GlossVideo,
    from: String,
    files_moved: bool,
}

/// Keeps stored video paths in line with gloss and dataset naming.
#[derive(Debug, Clone)]
pub struct RelocationService {
    /// Path derivation.
    layout: MediaLayout,
    /// Media root.
    storage: Arc<dyn StorageProvider>,
    /// Owners of videos.
    registry: GlossRegistry,
    /// Video index.
    catalog: VideoCatalog,
    /// Event publication.
    events: EventBus,
}

impl RelocationService {
    /// Creates a new relocation service.
    pub fn new(
        layout: MediaLayout,
        storage: Arc<dyn StorageProvider>,
        registry: GlossRegistry,
        catalog: VideoCatalog,
        events: EventBus,
    ) -> Self {
        Self {
            layout,
            storage,
            registry,
            catalog,
            events,
        }
    }

    /// Give one video its canonical path. With `move_files` the primary
    /// file, preview and poster are moved too; missing ones are skipped.
    /// Returns the updated video, or `None` if the path was already right.
    pub async fn relocate(
        &self,
        ctx: &ActorContext,
        id: VideoId,
        move_files: bool,
    ) -> AppResult<Option<GlossVideo>> {
        let gloss_id = self.catalog.get(id).await?.gloss_id;
        let owner = self.registry.owner(gloss_id).await?;

        let mut state = self.catalog.write().await;
        let moved = self.relocate_locked(&mut state, ctx, &owner, id, move_files).await?;
        drop(state);

        Ok(moved.map(|m| self.announce(ctx, m)))
    }

    /// Relocate every video of the given glosses.
    async fn relocate_glosses(
        &self,
        ctx: &ActorContext,
        gloss_ids: &[GlossId],
        move_files: bool,
    ) -> AppResult<Vec<GlossVideo>> {
        // Owners are resolved up front; the registry is never read while
        // the catalog guard is held.
        let mut owners = Vec::with_capacity(gloss_ids.len());
        for gloss_id in gloss_ids {
            match self.registry.owner(*gloss_id).await {
                Ok(owner) => owners.push(owner),
                Err(e) => debug!(gloss_id = %gloss_id, error = %e, "Gloss skipped for relocation"),
            }
        }

        let mut state = self.catalog.write().await;
        let mut moves = Vec::new();
        for owner in &owners {
            for video in state.for_gloss(owner.gloss_id) {
                if let Some(m) = self
                    .relocate_locked(&mut state, ctx, owner, video.id, move_files)
                    .await?
                {
                    moves.push(m);
                }
            }
        }
        drop(state);

        Ok(moves.into_iter().map(|m| self.announce(ctx, m)).collect())
    }

    /// React to a dataset acronym change: records are repointed, then the
    /// dataset's video and image directories are renamed as a whole.
    ///
    /// The directories to rename are those of the acronym the registry
    /// holds; `old_acronym` is only used when the registry already carries
    /// the new one.
    pub async fn on_dataset_acronym_changed(
        &self,
        ctx: &ActorContext,
        dataset_id: DatasetId,
        old_acronym: &str,
        new_acronym: &str,
    ) -> AppResult<Vec<GlossVideo>> {
        let current = self.registry.dataset(dataset_id).await?.acronym;
        let old_acronym = if current == new_acronym {
            old_acronym
        } else {
            if current != old_acronym {
                warn!(
                    dataset_id = %dataset_id,
                    stated = old_acronym,
                    registered = %current,
                    "Stated old acronym differs from registry, using registry"
                );
            }
            current.as_str()
        };
        let renames = [
            (
                self.layout.dataset_video_dir(old_acronym),
                self.layout.dataset_video_dir(new_acronym),
            ),
            (
                self.layout.dataset_image_dir(old_acronym),
                self.layout.dataset_image_dir(new_acronym),
            ),
        ];
        let mut pending = Vec::new();
        for (from, to) in renames {
            if from == to {
                continue;
            }
            if !self.storage.exists(&from).await? {
                debug!(dir = %from, "Dataset directory missing, nothing to rename");
                continue;
            }
            if self.storage.exists(&to).await? {
                return Err(AppError::conflict(format!(
                    "Cannot rename '{from}': '{to}' already exists"
                )));
            }
            pending.push((from, to));
        }

        let replaced = self
            .registry
            .set_dataset_acronym(dataset_id, new_acronym)
            .await?;
        debug!(dataset_id = %dataset_id, replaced = %replaced, "Registry acronym updated");
        let gloss_ids = self.registry.glosses_in_dataset(dataset_id).await;
        let moved = self.relocate_glosses(ctx, &gloss_ids, false).await?;

        for (from, to) in pending {
            self.storage.rename_dir(&from, &to).await?;
            info!(from = %from, to = %to, "Dataset directory renamed");
        }
        info!(
            dataset_id = %dataset_id,
            old_acronym,
            new_acronym,
            videos = moved.len(),
            "Dataset acronym change applied"
        );
        Ok(moved)
    }

    /// React to a dataset default language change: every display name may
    /// have changed, so every video of the dataset is moved.
    pub async fn on_default_language_changed(
        &self,
        ctx: &ActorContext,
        dataset_id: DatasetId,
        old_language: &str,
        new_language: &str,
    ) -> AppResult<Vec<GlossVideo>> {
        self.registry
            .set_default_language(dataset_id, new_language)
            .await?;
        let gloss_ids = self.registry.glosses_in_dataset(dataset_id).await;
        let moved = self.relocate_glosses(ctx, &gloss_ids, true).await?;
        info!(
            dataset_id = %dataset_id,
            old_language,
            new_language,
            videos = moved.len(),
            "Default language change applied"
        );
        Ok(moved)
    }

    /// React to a changed idgloss translation: the gloss's videos move.
    pub async fn on_idgloss_changed(
        &self,
        ctx: &ActorContext,
        gloss_id: GlossId,
        language: &str,
        new_idgloss: &str,
    ) -> AppResult<Vec<GlossVideo>> {
        let old = self
            .registry
            .set_translation(gloss_id, language, new_idgloss)
            .await?;
        let moved = self.relocate_glosses(ctx, &[gloss_id], true).await?;
        info!(
            gloss_id = %gloss_id,
            language,
            old_idgloss = old.as_deref().unwrap_or(""),
            new_idgloss,
            videos = moved.len(),
            "Idgloss change applied"
        );
        Ok(moved)
    }

    async fn relocate_locked(
        &self,
        state: &mut CatalogState,
        ctx: &ActorContext,
        owner: &VideoOwner,
        id: VideoId,
        move_files: bool,
    ) -> AppResult<Option<Move>> {
        let mut video = state.get(id)?.clone();
        let target = self.layout.video_file_path(owner, video.version);
        if target == video.videofile {
            return Ok(None);
        }

        let (mut small_moved, mut poster_moved) = (false, false);
        if move_files {
            self.move_if_present(&video.videofile, &target).await?;
            small_moved = self
                .move_if_present(&small_variant_path(&video.videofile), &small_variant_path(&target))
                .await?;
            poster_moved = self
                .move_if_present(
                    &self.layout.poster_path(&video.videofile),
                    &self.layout.poster_path(&target),
                )
                .await?;
        }
        // Flags describe files at the new path; anything left behind is regenerated.
        if !small_moved {
            video.artifact_mut(ArtifactKind::Small).invalidate();
        }
        if !poster_moved {
            video.artifact_mut(ArtifactKind::Poster).invalidate();
        }

        let from = std::mem::replace(&mut video.videofile, target);
        video.touch();
        state.update(video.clone())?;

        if move_files {
            state.record(GlossVideoHistory::new(
                VideoAction::Rename,
                video.gloss_id,
                &ctx.actor,
                Some(from.clone()),
                Some(self.storage.absolute_path(&video.videofile).display().to_string()),
            ));
        }
        Ok(Some(Move {
            video,
            from,
            files_moved: move_files,
        }))
    }

    /// Rename `from` to `to` if it exists; reports whether it did.
    async fn move_if_present(&self, from: &str, to: &str) -> AppResult<bool> {
        if !self.storage.exists(from).await? {
            debug!(from = %from, "Nothing to move");
            return Ok(false);
        }
        self.storage.rename(from, to).await?;
        debug!(from = %from, to = %to, "File moved");
        Ok(true)
    }

    fn announce(&self, ctx: &ActorContext, m: Move) -> GlossVideo {
        info!(
            video_id = %m.video.id,
            from = %m.from,
            to = %m.video.videofile,
            files_moved = m.files_moved,
            "Video relocated"
        );
        self.events.publish(
            Some(ctx.actor.clone()),
            GlossEvent::VideoMoved {
                video_id: m.video.id,
                from: m.from,
                to: m.video.videofile.clone(),
                files_moved: m.files_moved,
            },
        );
        m.video
    }
}
