//! Media storage layout configuration.

use serde::{Deserialize, Serialize};

/// Where gloss videos and their derived images live on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory all relative media paths are resolved against.
    #[serde(default = "default_writable_folder")]
    pub writable_folder: String,
    /// Top-level directory (under the root) holding gloss videos.
    #[serde(default = "default_video_directory")]
    pub video_directory: String,
    /// Top-level directory (under the root) holding poster images.
    #[serde(default = "default_image_directory")]
    pub image_directory: String,
    /// Extension used for poster images, without the leading dot.
    #[serde(default = "default_poster_extension")]
    pub poster_extension: String,
    /// JSON snapshot of the registry and video catalog, relative to the root.
    #[serde(default = "default_state_file")]
    pub state_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            writable_folder: default_writable_folder(),
            video_directory: default_video_directory(),
            image_directory: default_image_directory(),
            poster_extension: default_poster_extension(),
            state_file: default_state_file(),
        }
    }
}

fn default_writable_folder() -> String {
    "./writable".to_string()
}

fn default_video_directory() -> String {
    "glossvideo".to_string()
}

fn default_image_directory() -> String {
    "glossimage".to_string()
}

fn default_poster_extension() -> String {
    "png".to_string()
}

fn default_state_file() -> String {
    "glossvideo-state.json".to_string()
}
