//! Gloss video services.

pub mod artifacts;
pub mod relocation;
pub mod version;

pub use artifacts::ArtifactService;
pub use relocation::RelocationService;
pub use version::{RevertOutcome, VersionService};
