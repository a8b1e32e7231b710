//! # glossvideo-entity
//!
//! Domain records shared by the storage and service crates: datasets,
//! glosses, stored gloss videos and the upload/delete history.

pub mod gloss;
pub mod video;

pub use gloss::{Dataset, Gloss, VideoOwner};
pub use video::{ArtifactKind, ArtifactState, GlossVideo, GlossVideoHistory, VideoAction};
