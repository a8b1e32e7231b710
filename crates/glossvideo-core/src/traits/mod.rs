//! Core traits defined in `glossvideo-core` and implemented by other crates.

pub mod media;
pub mod storage;

pub use media::{FrameExtractor, ToolError, VideoResizer};
pub use storage::StorageProvider;
