//! Gloss video entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use glossvideo_core::types::{GlossId, VideoId};

/// A derived file kept next to a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// Still image shown before playback.
    Poster,
    /// Reduced-size `_small` preview variant.
    Small,
}

/// Whether a derived file has been generated for the current video path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactState {
    /// The artifact exists at its derived path.
    pub generated: bool,
    /// When it was last generated.
    pub generated_at: Option<DateTime<Utc>>,
}

impl ArtifactState {
    /// Record a successful generation.
    pub fn mark_generated(&mut self) {
        self.generated = true;
        self.generated_at = Some(Utc::now());
    }

    /// Forget the artifact; it regenerates lazily on next access.
    pub fn invalidate(&mut self) {
        self.generated = false;
        self.generated_at = None;
    }
}

/// A video file representing a gloss.
///
/// Version 0 is always the one that is displayed; higher versions are
/// backups carrying one `.bak` marker per version on their file name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlossVideo {
    /// Unique video identifier.
    pub id: VideoId,
    /// The gloss this video illustrates.
    pub gloss_id: GlossId,
    /// Video path relative to the writable folder.
    pub videofile: String,
    /// Backup generation; 0 is active.
    pub version: u32,
    /// Poster image state.
    #[serde(default)]
    pub poster: ArtifactState,
    /// Small preview state.
    #[serde(default)]
    pub small: ArtifactState,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl GlossVideo {
    /// Create the active (version 0) record for a freshly placed file.
    pub fn new(gloss_id: GlossId, videofile: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: VideoId::new(),
            gloss_id,
            videofile: videofile.into(),
            version: 0,
            poster: ArtifactState::default(),
            small: ArtifactState::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this is the displayed version.
    pub fn is_active(&self) -> bool {
        self.version == 0
    }

    /// State of the given derived artifact.
    pub fn artifact(&self, kind: ArtifactKind) -> &ArtifactState {
        match kind {
            ArtifactKind::Poster => &self.poster,
            ArtifactKind::Small => &self.small,
        }
    }

    /// Mutable state of the given derived artifact.
    pub fn artifact_mut(&mut self, kind: ArtifactKind) -> &mut ArtifactState {
        match kind {
            ArtifactKind::Poster => &mut self.poster,
            ArtifactKind::Small => &mut self.small,
        }
    }

    /// Bump the update timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// File name component of the stored path.
    pub fn file_name(&self) -> &str {
        self.videofile
            .rsplit('/')
            .next()
            .unwrap_or(&self.videofile)
    }
}

impl std::fmt::Display for GlossVideo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.videofile)
    }
}
