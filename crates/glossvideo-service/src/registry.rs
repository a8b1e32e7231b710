//! Registry of datasets and glosses that own videos.
//!
//! The dictionary itself is managed elsewhere; this registry mirrors the
//! fields path derivation needs and is kept current by the change events.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use glossvideo_core::error::AppError;
use glossvideo_core::result::AppResult;
use glossvideo_core::types::{DatasetId, GlossId};
use glossvideo_entity::{Dataset, Gloss, VideoOwner};

/// Plain registry contents.
#[derive(Debug, Clone, Default)]
struct RegistryState {
    datasets: BTreeMap<DatasetId, Dataset>,
    glosses: BTreeMap<GlossId, Gloss>,
}

/// Shared, lock-protected registry of datasets and glosses.
#[derive(Debug, Clone, Default)]
pub struct GlossRegistry {
    inner: Arc<RwLock<RegistryState>>,
}

/// Reject values that cannot be used as a single path segment.
fn validate_segment(what: &str, value: &str) -> AppResult<()> {
    if value.is_empty() {
        return Err(AppError::validation(format!("{what} must not be empty")));
    }
    if value.contains('/') || value.contains('\\') || value == "." || value == ".." {
        return Err(AppError::validation(format!(
            "{what} '{value}' cannot be used in a file path"
        )));
    }
    Ok(())
}

impl GlossRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dataset.
    pub async fn add_dataset(&self, dataset: Dataset) -> AppResult<()> {
        validate_segment("Dataset acronym", &dataset.acronym)?;
        let mut state = self.inner.write().await;
        if state.datasets.contains_key(&dataset.id) {
            return Err(AppError::conflict(format!(
                "Dataset {} already exists",
                dataset.id
            )));
        }
        if state.datasets.values().any(|d| d.acronym == dataset.acronym) {
            return Err(AppError::conflict(format!(
                "Dataset acronym '{}' is already in use",
                dataset.acronym
            )));
        }
        info!(dataset_id = %dataset.id, acronym = %dataset.acronym, "Dataset registered");
        state.datasets.insert(dataset.id, dataset);
        Ok(())
    }

    /// Look up a dataset.
    pub async fn dataset(&self, id: DatasetId) -> AppResult<Dataset> {
        self.inner
            .read()
            .await
            .datasets
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Dataset {id} not found")))
    }

    /// All datasets ordered by id.
    pub async fn datasets(&self) -> Vec<Dataset> {
        self.inner.read().await.datasets.values().cloned().collect()
    }

    /// Change a dataset's acronym, returning the previous one.
    pub async fn set_dataset_acronym(&self, id: DatasetId, acronym: &str) -> AppResult<String> {
        validate_segment("Dataset acronym", acronym)?;
        let mut state = self.inner.write().await;
        if state
            .datasets
            .values()
            .any(|d| d.id != id && d.acronym == acronym)
        {
            return Err(AppError::conflict(format!(
                "Dataset acronym '{acronym}' is already in use"
            )));
        }
        let dataset = state
            .datasets
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Dataset {id} not found")))?;
        Ok(std::mem::replace(&mut dataset.acronym, acronym.to_string()))
    }

    /// Change a dataset's default language, returning the previous one.
    pub async fn set_default_language(&self, id: DatasetId, language: &str) -> AppResult<String> {
        if language.is_empty() {
            return Err(AppError::validation("Language must not be empty"));
        }
        let mut state = self.inner.write().await;
        let dataset = state
            .datasets
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Dataset {id} not found")))?;
        Ok(std::mem::replace(
            &mut dataset.default_language,
            language.to_string(),
        ))
    }

    /// Register a gloss in an existing dataset.
    pub async fn add_gloss(&self, gloss: Gloss) -> AppResult<()> {
        for text in gloss.translations.values() {
            validate_segment("Idgloss", text)?;
        }
        let mut state = self.inner.write().await;
        if !state.datasets.contains_key(&gloss.dataset_id) {
            return Err(AppError::not_found(format!(
                "Dataset {} not found",
                gloss.dataset_id
            )));
        }
        if state.glosses.contains_key(&gloss.id) {
            return Err(AppError::conflict(format!("Gloss {} already exists", gloss.id)));
        }
        info!(gloss_id = %gloss.id, dataset_id = %gloss.dataset_id, "Gloss registered");
        state.glosses.insert(gloss.id, gloss);
        Ok(())
    }

    /// Look up a gloss.
    pub async fn gloss(&self, id: GlossId) -> AppResult<Gloss> {
        self.inner
            .read()
            .await
            .glosses
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Gloss {id} not found")))
    }

    /// All glosses ordered by id.
    pub async fn glosses(&self) -> Vec<Gloss> {
        self.inner.read().await.glosses.values().cloned().collect()
    }

    /// Ids of the glosses belonging to a dataset.
    pub async fn glosses_in_dataset(&self, dataset_id: DatasetId) -> Vec<GlossId> {
        self.inner
            .read()
            .await
            .glosses
            .values()
            .filter(|g| g.dataset_id == dataset_id)
            .map(|g| g.id)
            .collect()
    }

    /// Set one idgloss translation of a gloss, returning the previous text.
    pub async fn set_translation(
        &self,
        gloss_id: GlossId,
        language: &str,
        text: &str,
    ) -> AppResult<Option<String>> {
        validate_segment("Idgloss", text)?;
        let mut state = self.inner.write().await;
        let gloss = state
            .glosses
            .get_mut(&gloss_id)
            .ok_or_else(|| AppError::not_found(format!("Gloss {gloss_id} not found")))?;
        Ok(gloss
            .translations
            .insert(language.to_string(), text.to_string()))
    }

    /// The path-relevant view of a gloss.
    pub async fn owner(&self, gloss_id: GlossId) -> AppResult<VideoOwner> {
        let state = self.inner.read().await;
        let gloss = state
            .glosses
            .get(&gloss_id)
            .ok_or_else(|| AppError::not_found(format!("Gloss {gloss_id} not found")))?;
        let dataset = state.datasets.get(&gloss.dataset_id).ok_or_else(|| {
            AppError::not_found(format!("Dataset {} not found", gloss.dataset_id))
        })?;
        VideoOwner::resolve(gloss, dataset).ok_or_else(|| {
            AppError::validation(format!("Gloss {gloss_id} has no idgloss translation"))
        })
    }

    /// Replace the whole registry content.
    pub async fn replace(&self, datasets: Vec<Dataset>, glosses: Vec<Gloss>) {
        let mut state = self.inner.write().await;
        state.datasets = datasets.into_iter().map(|d| (d.id, d)).collect();
        state.glosses = glosses.into_iter().map(|g| (g.id, g)).collect();
    }
}
