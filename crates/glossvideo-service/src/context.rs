//! Context carrying who is acting on the video store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Actor name used for changes not initiated by a user.
pub const SYSTEM_ACTOR: &str = "system";

/// Context for the current operation.
///
/// Passed into service methods so history entries and events know *who*
/// caused a change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorContext {
    /// The acting user's name.
    pub actor: String,
    /// When the operation started.
    pub request_time: DateTime<Utc>,
}

impl ActorContext {
    /// Creates a context for a named user.
    pub fn new(actor: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            request_time: Utc::now(),
        }
    }

    /// Context for changes triggered by metadata events.
    pub fn system() -> Self {
        Self::new(SYSTEM_ACTOR)
    }
}
