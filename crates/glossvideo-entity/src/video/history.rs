//! History of video uploading, renaming and deletion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use glossvideo_core::types::{GlossId, HistoryId};

/// Placeholder recorded when a path is not known.
pub const NOT_SPECIFIED: &str = "(not specified)";

/// What happened to a gloss video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoAction {
    /// The video was removed.
    Delete,
    /// A new video was uploaded.
    Upload,
    /// The video was moved to a new path.
    Rename,
    /// The video was viewed.
    Watch,
}

impl VideoAction {
    /// The stored action name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Upload => "upload",
            Self::Rename => "rename",
            Self::Watch => "watch",
        }
    }
}

impl std::fmt::Display for VideoAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry in a gloss's video history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlossVideoHistory {
    /// Entry identifier.
    pub id: HistoryId,
    /// What was done.
    pub action: VideoAction,
    /// When it was done.
    pub datestamp: DateTime<Utc>,
    /// The path the user uploaded from.
    pub uploadfile: String,
    /// The full target path.
    pub goal_location: String,
    /// The user who performed the action.
    pub actor: String,
    /// The gloss whose video was affected.
    pub gloss_id: GlossId,
}

impl GlossVideoHistory {
    /// Create an entry stamped with the current time.
    pub fn new(
        action: VideoAction,
        gloss_id: GlossId,
        actor: impl Into<String>,
        uploadfile: Option<String>,
        goal_location: Option<String>,
    ) -> Self {
        Self {
            id: HistoryId::new(),
            action,
            datestamp: Utc::now(),
            uploadfile: uploadfile.unwrap_or_else(|| NOT_SPECIFIED.to_string()),
            goal_location: goal_location.unwrap_or_else(|| NOT_SPECIFIED.to_string()),
            actor: actor.into(),
            gloss_id,
        }
    }
}

impl std::fmt::Display for GlossVideoHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}, ({})", self.gloss_id, self.action, self.datestamp)
    }
}
