//! Dataset and gloss models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use glossvideo_core::types::{DatasetId, GlossId};

/// A dataset groups glosses; its acronym is the top-level media directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    /// Dataset identifier.
    pub id: DatasetId,
    /// Short name used as directory segment, e.g. `NGT`.
    pub acronym: String,
    /// Language whose lemma translations provide gloss display names.
    pub default_language: String,
}

impl Dataset {
    /// Create a dataset.
    pub fn new(
        id: DatasetId,
        acronym: impl Into<String>,
        default_language: impl Into<String>,
    ) -> Self {
        Self {
            id,
            acronym: acronym.into(),
            default_language: default_language.into(),
        }
    }
}

/// A dictionary entry illustrated by videos.
///
/// The display name (idgloss) is the lemma translation in the dataset's
/// default language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gloss {
    /// Gloss identifier, part of every video file name.
    pub id: GlossId,
    /// The dataset this gloss belongs to.
    pub dataset_id: DatasetId,
    /// Lemma idgloss translations keyed by language code.
    #[serde(default)]
    pub translations: BTreeMap<String, String>,
}

impl Gloss {
    /// Create a gloss without translations.
    pub fn new(id: GlossId, dataset_id: DatasetId) -> Self {
        Self {
            id,
            dataset_id,
            translations: BTreeMap::new(),
        }
    }

    /// Builder-style translation setter.
    pub fn with_translation(mut self, language: impl Into<String>, text: impl Into<String>) -> Self {
        self.translations.insert(language.into(), text.into());
        self
    }

    /// The display name for a default language.
    ///
    /// Falls back to the first translation (by language code) when the
    /// default language has none.
    pub fn idgloss(&self, default_language: &str) -> Option<&str> {
        self.translations
            .get(default_language)
            .or_else(|| self.translations.values().next())
            .map(String::as_str)
    }
}

/// The owning-entity fields that determine where a video is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoOwner {
    /// Gloss identifier.
    pub gloss_id: GlossId,
    /// Gloss display name.
    pub idgloss: String,
    /// Acronym of the gloss's dataset.
    pub dataset_acronym: String,
}

impl VideoOwner {
    /// Build the owner view of a gloss within its dataset, if the gloss
    /// has a display name.
    pub fn resolve(gloss: &Gloss, dataset: &Dataset) -> Option<Self> {
        gloss
            .idgloss(&dataset.default_language)
            .map(|idgloss| Self {
                gloss_id: gloss.id,
                idgloss: idgloss.to_string(),
                dataset_acronym: dataset.acronym.clone(),
            })
    }
}
