//! JSON snapshot of the registry and catalog, used by the CLI to keep
//! state between invocations.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use glossvideo_core::result::AppResult;
use glossvideo_core::traits::StorageProvider;
use glossvideo_entity::{Dataset, Gloss, GlossVideo, GlossVideoHistory};

use crate::catalog::VideoCatalog;
use crate::registry::GlossRegistry;

/// Serializable copy of everything the store knows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Registered datasets.
    #[serde(default)]
    pub datasets: Vec<Dataset>,
    /// Registered glosses.
    #[serde(default)]
    pub glosses: Vec<Gloss>,
    /// Stored videos.
    #[serde(default)]
    pub videos: Vec<GlossVideo>,
    /// Video history, oldest first.
    #[serde(default)]
    pub history: Vec<GlossVideoHistory>,
}

impl StateSnapshot {
    /// Copy the current state.
    pub async fn capture(registry: &GlossRegistry, catalog: &VideoCatalog) -> Self {
        let datasets = registry.datasets().await;
        let glosses = registry.glosses().await;
        let state = catalog.read().await;
        let mut videos: Vec<GlossVideo> = state.videos().cloned().collect();
        videos.sort_by_key(|v| (v.gloss_id, v.version));
        Self {
            datasets,
            glosses,
            videos,
            history: state.all_history().to_vec(),
        }
    }

    /// Replace the live state with this snapshot.
    pub async fn restore_into(
        self,
        registry: &GlossRegistry,
        catalog: &VideoCatalog,
    ) -> AppResult<()> {
        catalog.replace(self.videos, self.history).await?;
        registry.replace(self.datasets, self.glosses).await;
        Ok(())
    }

    /// Read a snapshot; a missing file is an empty state.
    pub async fn load(storage: &dyn StorageProvider, path: &str) -> AppResult<Self> {
        if !storage.exists(path).await? {
            debug!(path = %path, "No state snapshot, starting empty");
            return Ok(Self::default());
        }
        let raw = storage.read_bytes(path).await?;
        let snapshot: Self = serde_json::from_slice(&raw)?;
        debug!(
            path = %path,
            videos = snapshot.videos.len(),
            "State snapshot loaded"
        );
        Ok(snapshot)
    }

    /// Write the snapshot through a temporary file so a crash never
    /// leaves a truncated state behind.
    pub async fn save(&self, storage: &dyn StorageProvider, path: &str) -> AppResult<()> {
        let data = serde_json::to_vec_pretty(self)?;
        let tmp = format!("{path}.tmp");
        storage.write(&tmp, Bytes::from(data)).await?;
        storage.rename(&tmp, path).await?;
        info!(path = %path, videos = self.videos.len(), "State snapshot saved");
        Ok(())
    }
}
