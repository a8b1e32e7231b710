//! # glossvideo-storage
//!
//! Filesystem side of gloss video storage: canonical path derivation,
//! the local storage provider, and ffmpeg-backed frame extraction and
//! resizing.

pub mod paths;
pub mod providers;
pub mod tools;

pub use paths::MediaLayout;
pub use providers::LocalStorageProvider;
pub use tools::{FfmpegFrameExtractor, FfmpegVideoResizer};
