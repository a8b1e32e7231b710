//! Collaborator traits for external media tools.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::error::{AppError, ErrorKind};

/// Errors from external media tool execution.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The tool binary could not be started.
    #[error("Media tool not found or not executable: {0}")]
    CommandNotFound(String),

    /// The tool did not finish in time.
    #[error("Media tool timed out after {0} seconds")]
    Timeout(u64),

    /// The tool exited with a non-zero code.
    #[error("Media tool failed with exit code {code}: {stderr}")]
    ProcessFailed {
        /// The exit code.
        code: i32,
        /// Standard error output (truncated).
        stderr: String,
    },

    /// IO error around the tool run.
    #[error("IO error running media tool: {0}")]
    Io(#[from] std::io::Error),

    /// The tool succeeded but did not produce its output.
    #[error("Expected output file not created: {0}")]
    OutputMissing(String),
}

impl From<ToolError> for AppError {
    fn from(err: ToolError) -> Self {
        AppError::with_source(ErrorKind::ExternalService, err.to_string(), err)
    }
}

/// Grabs a still frame from a video, used for poster images.
#[async_trait]
pub trait FrameExtractor: Send + Sync + std::fmt::Debug + 'static {
    /// Write one frame of `video` to `output`.
    async fn extract_frame(&self, video: &Path, output: &Path) -> Result<(), ToolError>;
}

/// Produces reduced-size video variants.
#[async_trait]
pub trait VideoResizer: Send + Sync + std::fmt::Debug + 'static {
    /// Resize each of `videos` to `width`; a zero `height` keeps the aspect
    /// ratio and a zero `bitrate` keeps the tool default. Returns the
    /// written variant paths.
    async fn resize(
        &self,
        videos: &[PathBuf],
        width: u32,
        height: u32,
        bitrate: u32,
    ) -> Result<Vec<PathBuf>, ToolError>;
}
