//! # glossvideo-service
//!
//! Service layer for gloss videos. Services orchestrate the gloss
//! registry, the video catalog, the storage provider and the external
//! media tools to implement upload rotation, reversion, relocation and
//! lazy poster/preview generation.
//!
//! Services follow constructor injection; [`MediaStore`] wires the
//! standard set together.

pub mod catalog;
pub mod context;
pub mod events;
pub mod registry;
pub mod snapshot;
pub mod store;
pub mod video;

pub use catalog::{CatalogState, VideoCatalog};
pub use context::ActorContext;
pub use events::{EventBus, EventHandler};
pub use registry::GlossRegistry;
pub use snapshot::StateSnapshot;
pub use store::MediaStore;
pub use video::{ArtifactService, RelocationService, RevertOutcome, VersionService};
