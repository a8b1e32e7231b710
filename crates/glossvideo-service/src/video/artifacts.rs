//! Poster images and reduced-size previews derived from gloss videos.
//!
//! Generation is best effort: a failing tool is logged and the video
//! simply has no poster or preview until the next attempt.

use std::sync::Arc;

use tracing::{debug, info, warn};

use glossvideo_core::result::AppResult;
use glossvideo_core::traits::{FrameExtractor, StorageProvider, VideoResizer};
use glossvideo_core::types::VideoId;
use glossvideo_entity::{ArtifactKind, GlossVideo};
use glossvideo_storage::MediaLayout;
use glossvideo_storage::paths::small_variant_path;

use crate::catalog::VideoCatalog;

/// Generates, locates and removes the files derived from a video.
#[derive(Debug, Clone)]
pub struct ArtifactService {
    /// Path derivation.
    layout: MediaLayout,
    /// Media root.
    storage: Arc<dyn StorageProvider>,
    /// Poster frame grabber.
    extractor: Arc<dyn FrameExtractor>,
    /// Preview encoder.
    resizer: Arc<dyn VideoResizer>,
    /// Video index, for persisting artifact state.
    catalog: VideoCatalog,
    /// Width of the `_small` preview.
    small_width: u32,
}

impl ArtifactService {
    /// Creates a new artifact service.
    pub fn new(
        layout: MediaLayout,
        storage: Arc<dyn StorageProvider>,
        extractor: Arc<dyn FrameExtractor>,
        resizer: Arc<dyn VideoResizer>,
        catalog: VideoCatalog,
        small_width: u32,
    ) -> Self {
        Self {
            layout,
            storage,
            extractor,
            resizer,
            catalog,
            small_width,
        }
    }

    /// Derived path of an artifact for the video's current path.
    pub fn artifact_path(&self, video: &GlossVideo, kind: ArtifactKind) -> String {
        match kind {
            ArtifactKind::Poster => self.layout.poster_path(&video.videofile),
            ArtifactKind::Small => small_variant_path(&video.videofile),
        }
    }

    /// Whether the artifact is present, trusting the flag first and the
    /// filesystem second. A file found on disk sets the flag.
    async fn locate(&self, video: &mut GlossVideo, kind: ArtifactKind) -> Option<String> {
        let path = self.artifact_path(video, kind);
        if video.artifact(kind).generated {
            return Some(path);
        }
        match self.storage.exists(&path).await {
            Ok(true) => {
                video.artifact_mut(kind).mark_generated();
                Some(path)
            }
            Ok(false) => None,
            Err(e) => {
                warn!(video_id = %video.id, path = %path, error = %e, "Could not check artifact");
                None
            }
        }
    }

    /// Poster path of a video. When missing and `create` is set, a poster
    /// is extracted first; `None` if it is still missing.
    pub async fn poster_path(&self, video: &mut GlossVideo, create: bool) -> Option<String> {
        if let Some(path) = self.locate(video, ArtifactKind::Poster).await {
            return Some(path);
        }
        if !create {
            return None;
        }
        self.make_poster(video).await;
        video
            .poster
            .generated
            .then(|| self.artifact_path(video, ArtifactKind::Poster))
    }

    /// Extract a poster frame for the video.
    pub async fn make_poster(&self, video: &mut GlossVideo) {
        let output = self.artifact_path(video, ArtifactKind::Poster);
        let source = self.storage.absolute_path(&video.videofile);
        let target = self.storage.absolute_path(&output);

        match self.extractor.extract_frame(&source, &target).await {
            Ok(()) => {
                video.poster.mark_generated();
                info!(video_id = %video.id, poster = %output, "Poster generated");
            }
            Err(e) => {
                video.poster.invalidate();
                warn!(video_id = %video.id, error = %e, "Poster generation failed");
            }
        }
    }

    /// Encode the reduced-size preview for the video.
    pub async fn make_small_video(&self, video: &mut GlossVideo) {
        let source = self.storage.absolute_path(&video.videofile);
        match self
            .resizer
            .resize(std::slice::from_ref(&source), self.small_width, 0, 0)
            .await
        {
            Ok(written) => {
                video.small.mark_generated();
                info!(video_id = %video.id, outputs = written.len(), "Small video generated");
            }
            Err(e) => {
                video.small.invalidate();
                warn!(video_id = %video.id, error = %e, "Small video generation failed");
            }
        }
    }

    /// Preview path of a video, if one exists.
    pub async fn small_video(&self, video: &mut GlossVideo) -> Option<String> {
        self.locate(video, ArtifactKind::Small).await
    }

    /// Remove the primary file, preview and poster. Failures are logged.
    pub async fn delete_files(&self, video: &GlossVideo) {
        let paths = [
            video.videofile.clone(),
            self.artifact_path(video, ArtifactKind::Small),
            self.artifact_path(video, ArtifactKind::Poster),
        ];
        for path in paths {
            if let Err(e) = self.storage.delete(&path).await {
                warn!(video_id = %video.id, path = %path, error = %e, "Could not delete file");
            }
        }
    }

    /// Delete the artifact at the video's current path and clear its flag.
    pub async fn discard(&self, video: &mut GlossVideo, kind: ArtifactKind) {
        let path = self.artifact_path(video, kind);
        match self.storage.delete(&path).await {
            Ok(()) => debug!(video_id = %video.id, path = %path, "Artifact discarded"),
            Err(e) => warn!(video_id = %video.id, path = %path, error = %e, "Could not discard artifact"),
        }
        video.artifact_mut(kind).invalidate();
    }

    /// Return the poster of a stored video, extracting it if needed, and
    /// persist the resulting state.
    pub async fn ensure_poster(&self, id: VideoId) -> AppResult<Option<String>> {
        let mut video = self.catalog.get(id).await?;
        let path = self.poster_path(&mut video, true).await;
        self.persist(&video).await?;
        Ok(path)
    }

    /// Return the preview of a stored video, encoding it if needed, and
    /// persist the resulting state.
    pub async fn ensure_small(&self, id: VideoId) -> AppResult<Option<String>> {
        let mut video = self.catalog.get(id).await?;
        if self.small_video(&mut video).await.is_none() {
            self.make_small_video(&mut video).await;
        }
        let path = video
            .small
            .generated
            .then(|| self.artifact_path(&video, ArtifactKind::Small));
        self.persist(&video).await?;
        Ok(path)
    }

    /// Regenerate the selected artifacts of a stored video.
    pub async fn regenerate(&self, id: VideoId, poster: bool, small: bool) -> AppResult<GlossVideo> {
        let mut video = self.catalog.get(id).await?;
        if poster {
            self.make_poster(&mut video).await;
        }
        if small {
            self.make_small_video(&mut video).await;
        }
        self.persist(&video).await?;
        Ok(video)
    }

    /// Copy artifact state onto the stored record, unless the record was
    /// moved or removed while the tools ran.
    async fn persist(&self, video: &GlossVideo) -> AppResult<()> {
        let mut state = self.catalog.write().await;
        let Ok(current) = state.get(video.id) else {
            debug!(video_id = %video.id, "Video removed during artifact generation");
            return Ok(());
        };
        if current.videofile != video.videofile {
            debug!(video_id = %video.id, "Video moved during artifact generation");
            return Ok(());
        }
        let mut updated = current.clone();
        if updated.poster == video.poster && updated.small == video.small {
            return Ok(());
        }
        updated.poster = video.poster.clone();
        updated.small = video.small.clone();
        updated.touch();
        state.update(updated)
    }
}
