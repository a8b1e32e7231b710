//! ffmpeg-backed frame extraction and video resizing.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;

use glossvideo_core::config::media::MediaConfig;
use glossvideo_core::traits::media::{FrameExtractor, ToolError, VideoResizer};

use super::executor::ToolExecutor;
use crate::paths::small_variant_path;

/// Grabs a poster frame with ffmpeg.
#[derive(Debug, Clone)]
pub struct FfmpegFrameExtractor {
    executor: ToolExecutor,
    offset_seconds: f64,
}

impl FfmpegFrameExtractor {
    /// Create an extractor from media configuration.
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            executor: ToolExecutor::new(
                &config.ffmpeg_program,
                Duration::from_secs(config.tool_timeout_seconds),
            ),
            offset_seconds: config.poster_offset_seconds,
        }
    }

    /// Arguments for grabbing a single frame of `video` into `output`.
    pub fn build_args(&self, video: &Path, output: &Path) -> Vec<String> {
        vec![
            "-nostdin".to_string(),
            "-y".to_string(),
            "-ss".to_string(),
            format!("{:.3}", self.offset_seconds),
            "-i".to_string(),
            video.to_string_lossy().to_string(),
            "-frames:v".to_string(),
            "1".to_string(),
            output.to_string_lossy().to_string(),
        ]
    }
}

#[async_trait]
impl FrameExtractor for FfmpegFrameExtractor {
    async fn extract_frame(&self, video: &Path, output: &Path) -> Result<(), ToolError> {
        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        self.executor.run(&self.build_args(video, output)).await?;

        if !tokio::fs::try_exists(output).await? {
            return Err(ToolError::OutputMissing(output.display().to_string()));
        }
        Ok(())
    }
}

/// Writes `_small` preview variants with ffmpeg.
#[derive(Debug, Clone)]
pub struct FfmpegVideoResizer {
    executor: ToolExecutor,
}

impl FfmpegVideoResizer {
    /// Create a resizer from media configuration.
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            executor: ToolExecutor::new(
                &config.ffmpeg_program,
                Duration::from_secs(config.tool_timeout_seconds),
            ),
        }
    }

    /// Arguments for resizing `video` into `output`.
    pub fn build_args(
        &self,
        video: &Path,
        output: &Path,
        width: u32,
        height: u32,
        bitrate: u32,
    ) -> Vec<String> {
        // -2 keeps the aspect ratio while staying divisible by two for h264.
        let height = if height == 0 {
            "-2".to_string()
        } else {
            height.to_string()
        };
        let mut args = vec![
            "-nostdin".to_string(),
            "-y".to_string(),
            "-i".to_string(),
            video.to_string_lossy().to_string(),
            "-vf".to_string(),
            format!("scale={width}:{height}"),
        ];
        if bitrate > 0 {
            args.push("-b:v".to_string());
            args.push(format!("{bitrate}k"));
        }
        args.push("-c:a".to_string());
        args.push("copy".to_string());
        args.push(output.to_string_lossy().to_string());
        args
    }
}

#[async_trait]
impl VideoResizer for FfmpegVideoResizer {
    async fn resize(
        &self,
        videos: &[PathBuf],
        width: u32,
        height: u32,
        bitrate: u32,
    ) -> Result<Vec<PathBuf>, ToolError> {
        let mut written = Vec::with_capacity(videos.len());
        for video in videos {
            let output = PathBuf::from(small_variant_path(&video.to_string_lossy()));
            if output == *video {
                continue;
            }
            self.executor
                .run(&self.build_args(video, &output, width, height, bitrate))
                .await?;
            if !tokio::fs::try_exists(&output).await? {
                return Err(ToolError::OutputMissing(output.display().to_string()));
            }
            written.push(output);
        }
        Ok(written)
    }
}
