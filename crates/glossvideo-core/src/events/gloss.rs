//! Gloss and gloss-video events.

use serde::{Deserialize, Serialize};

use crate::types::{DatasetId, GlossId, VideoId};

/// Events related to glosses, datasets and their videos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GlossEvent {
    /// A dataset's acronym changed. Its top-level directories must follow.
    DatasetAcronymChanged {
        /// The dataset.
        dataset_id: DatasetId,
        /// Acronym before the change.
        old_acronym: String,
        /// Acronym after the change.
        new_acronym: String,
    },
    /// A dataset's default language changed, so every idgloss may change.
    DatasetLanguageChanged {
        /// The dataset.
        dataset_id: DatasetId,
        /// Language code before the change.
        old_language: String,
        /// Language code after the change.
        new_language: String,
    },
    /// A lemma idgloss translation of a gloss changed.
    IdglossChanged {
        /// The gloss.
        gloss_id: GlossId,
        /// Language of the translation.
        language: String,
        /// Translation before the change, if there was one.
        old_idgloss: Option<String>,
        /// Translation after the change.
        new_idgloss: String,
    },
    /// A video was uploaded and became the active version.
    VideoUploaded {
        /// The new video record.
        video_id: VideoId,
        /// Owning gloss.
        gloss_id: GlossId,
        /// Stored relative path.
        path: String,
    },
    /// A backup video was moved one slot closer to active.
    VideoReverted {
        /// The video record.
        video_id: VideoId,
        /// Owning gloss.
        gloss_id: GlossId,
        /// Version after the revert.
        version: u32,
    },
    /// A video and its derived files were removed.
    VideoDeleted {
        /// The removed video record.
        video_id: VideoId,
        /// Owning gloss.
        gloss_id: GlossId,
    },
    /// A video's stored path changed.
    VideoMoved {
        /// The video record.
        video_id: VideoId,
        /// Path before the move.
        from: String,
        /// Path after the move.
        to: String,
        /// Whether files were physically moved.
        files_moved: bool,
    },
}

impl GlossEvent {
    /// Whether this event is a metadata change that requires relocation.
    pub fn is_relocation_trigger(&self) -> bool {
        matches!(
            self,
            Self::DatasetAcronymChanged { .. }
                | Self::DatasetLanguageChanged { .. }
                | Self::IdglossChanged { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_serialization() {
        let event = GlossEvent::IdglossChanged {
            gloss_id: GlossId(12),
            language: "en".into(),
            old_idgloss: Some("HOUSE".into()),
            new_idgloss: "HOME".into(),
        };
        let json = serde_json::to_value(&event).expect("serialize");
        assert_eq!(json["type"], "IdglossChanged");
        assert_eq!(json["gloss_id"], 12);
        assert!(event.is_relocation_trigger());
    }

    #[test]
    fn test_video_events_are_not_triggers() {
        let event = GlossEvent::VideoDeleted {
            video_id: VideoId::new(),
            gloss_id: GlossId(1),
        };
        assert!(!event.is_relocation_trigger());
    }
}
