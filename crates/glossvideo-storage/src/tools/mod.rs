//! External media tools.

pub mod executor;
pub mod ffmpeg;

pub use executor::{ToolExecutor, ToolOutput};
pub use ffmpeg::{FfmpegFrameExtractor, FfmpegVideoResizer};
