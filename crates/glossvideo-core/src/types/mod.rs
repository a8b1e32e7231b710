//! Shared value types.

pub mod id;

pub use id::{DatasetId, GlossId, HistoryId, VideoId};
