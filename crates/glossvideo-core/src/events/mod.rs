//! Domain events consumed and emitted by the gloss video store.
//!
//! The dictionary publishes metadata changes (dataset renamed, default
//! language switched, gloss renamed) which trigger file relocation; the
//! store itself publishes what happened to each video.

pub mod gloss;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use gloss::GlossEvent;

/// Wrapper for domain events with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// Name of the user who caused the event, if known.
    pub actor: Option<String>,
    /// The event payload.
    pub payload: GlossEvent,
}

impl DomainEvent {
    /// Create a new domain event.
    pub fn new(actor: Option<String>, payload: GlossEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            actor,
            payload,
        }
    }
}
