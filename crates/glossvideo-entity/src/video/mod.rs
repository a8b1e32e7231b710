//! Gloss video entities.

pub mod history;
pub mod model;

pub use history::{GlossVideoHistory, VideoAction};
pub use model::{ArtifactKind, ArtifactState, GlossVideo};
