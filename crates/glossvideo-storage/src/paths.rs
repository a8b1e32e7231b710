//! Canonical path derivation for gloss videos and their derived files.
//!
//! Layout, relative to the writable folder:
//!
//! ```text
//! <video-dir>/<dataset-acronym>/<two-char-prefix>/<idgloss>-<gloss-id>.mp4[.bak]*
//! <image-dir>/<dataset-acronym>/<two-char-prefix>/<idgloss>-<gloss-id>.<poster-ext>
//! ```
//!
//! Everything here is pure string manipulation; nothing touches the disk.

use glossvideo_core::config::storage::StorageConfig;
use glossvideo_core::error::AppError;
use glossvideo_core::result::AppResult;
use glossvideo_entity::VideoOwner;

/// Suffix appended once per backup generation.
pub const BACKUP_MARKER: &str = ".bak";

/// Suffix inserted before the extension of the reduced-size preview.
pub const SMALL_SUFFIX: &str = "_small";

/// Extension of stored videos.
pub const VIDEO_EXTENSION: &str = ".mp4";

/// Filler for display names shorter than two characters.
pub const PREFIX_PADDING: char = '-';

/// Derives where videos, previews and posters live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaLayout {
    video_directory: String,
    image_directory: String,
    poster_extension: String,
}

impl MediaLayout {
    /// Create a layout from explicit directory names.
    pub fn new(
        video_directory: impl Into<String>,
        image_directory: impl Into<String>,
        poster_extension: impl Into<String>,
    ) -> Self {
        Self {
            video_directory: video_directory.into().trim_matches('/').to_string(),
            image_directory: image_directory.into().trim_matches('/').to_string(),
            poster_extension: poster_extension.into().trim_start_matches('.').to_string(),
        }
    }

    /// Create a layout from storage configuration.
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(
            &config.video_directory,
            &config.image_directory,
            &config.poster_extension,
        )
    }

    /// Top-level video directory.
    pub fn video_directory(&self) -> &str {
        &self.video_directory
    }

    /// Top-level image directory.
    pub fn image_directory(&self) -> &str {
        &self.image_directory
    }

    /// Canonical path of a gloss video at the given backup generation.
    pub fn video_file_path(&self, owner: &VideoOwner, version: u32) -> String {
        let mut filename = format!("{}-{}{}", owner.idgloss, owner.gloss_id, VIDEO_EXTENSION);
        for _ in 0..version {
            filename.push_str(BACKUP_MARKER);
        }
        format!(
            "{}/{}/{}/{}",
            self.video_directory,
            owner.dataset_acronym,
            two_letter_dir(&owner.idgloss),
            filename
        )
    }

    /// Directory holding every video of a dataset.
    pub fn dataset_video_dir(&self, acronym: &str) -> String {
        format!("{}/{}", self.video_directory, acronym)
    }

    /// Directory holding every poster image of a dataset.
    pub fn dataset_image_dir(&self, acronym: &str) -> String {
        format!("{}/{}", self.image_directory, acronym)
    }

    /// Poster image path for a video path: the video directory segment is
    /// swapped for the image directory and the last extension replaced.
    pub fn poster_path(&self, video_path: &str) -> String {
        let (stem, _) = split_extension(video_path);
        let video_prefix = format!("{}/", self.video_directory);
        let stem = match stem.strip_prefix(&video_prefix) {
            Some(rest) => format!("{}/{}", self.image_directory, rest),
            None => stem.to_string(),
        };
        format!("{}.{}", stem, self.poster_extension)
    }
}

/// Two-character directory partition for a display name.
pub fn two_letter_dir(idgloss: &str) -> String {
    let mut dir: String = idgloss.chars().take(2).collect();
    while dir.chars().count() < 2 {
        dir.push(PREFIX_PADDING);
    }
    dir
}

/// Split a path into stem and last extension (with its dot).
///
/// Dots leading the file name do not start an extension, so
/// `dir/.hidden` has none.
pub fn split_extension(path: &str) -> (&str, &str) {
    let name_start = path.rfind('/').map(|i| i + 1).unwrap_or(0);
    let name = &path[name_start..];
    let trimmed = name.trim_start_matches('.');
    let leading = name.len() - trimmed.len();
    match trimmed.rfind('.') {
        Some(dot) => {
            let idx = name_start + leading + dot;
            (&path[..idx], &path[idx..])
        }
        None => (path, ""),
    }
}

/// Path of the reduced-size preview next to a video.
pub fn small_variant_path(path: &str) -> String {
    let (stem, ext) = split_extension(path);
    if stem.ends_with(SMALL_SUFFIX) {
        path.to_string()
    } else {
        format!("{stem}{SMALL_SUFFIX}{ext}")
    }
}

/// Whether a stored path ends with a backup marker.
pub fn has_backup_marker(path: &str) -> bool {
    split_extension(path).1 == BACKUP_MARKER
}

/// Remove one backup marker from a stored path.
///
/// A path without the marker means the version chain is corrupted.
pub fn strip_backup_marker(path: &str) -> AppResult<String> {
    let (stem, ext) = split_extension(path);
    if ext != BACKUP_MARKER {
        return Err(AppError::format(format!(
            "Unknown suffix on stored video file '{path}'. Expected {BACKUP_MARKER}"
        )));
    }
    Ok(stem.to_string())
}

/// Append one backup marker to a stored path.
pub fn add_backup_marker(path: &str) -> String {
    format!("{path}{BACKUP_MARKER}")
}
