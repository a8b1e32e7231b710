//! External media tool configuration.

use serde::{Deserialize, Serialize};

/// Settings for the frame extractor and video resizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Path or name of the ffmpeg binary.
    #[serde(default = "default_ffmpeg_program")]
    pub ffmpeg_program: String,
    /// Target width in pixels of the `_small` preview variant.
    #[serde(default = "default_small_video_width")]
    pub small_video_width: u32,
    /// Seconds into the video at which the poster frame is grabbed.
    #[serde(default)]
    pub poster_offset_seconds: f64,
    /// Timeout applied to every external tool invocation.
    #[serde(default = "default_tool_timeout")]
    pub tool_timeout_seconds: u64,
    /// Generate the poster image right after an upload.
    #[serde(default = "default_true")]
    pub generate_poster_on_upload: bool,
    /// Generate the small preview right after an upload.
    #[serde(default = "default_true")]
    pub generate_small_on_upload: bool,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            ffmpeg_program: default_ffmpeg_program(),
            small_video_width: default_small_video_width(),
            poster_offset_seconds: 0.0,
            tool_timeout_seconds: default_tool_timeout(),
            generate_poster_on_upload: true,
            generate_small_on_upload: true,
        }
    }
}

fn default_ffmpeg_program() -> String {
    "ffmpeg".to_string()
}

fn default_small_video_width() -> u32 {
    180
}

fn default_tool_timeout() -> u64 {
    120
}

fn default_true() -> bool {
    true
}
