//! Dictionary entities that own videos.

pub mod model;

pub use model::{Dataset, Gloss, VideoOwner};
