//! Gloss video CLI commands.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use glossvideo_core::error::AppError;
use glossvideo_core::types::{GlossId, VideoId};
use glossvideo_entity::{GlossVideo, GlossVideoHistory};
use glossvideo_service::{ActorContext, MediaStore, RevertOutcome};

use crate::output::{self, OutputFormat};

/// Arguments for video commands
#[derive(Debug, Args)]
pub struct VideoArgs {
    /// Video subcommand
    #[command(subcommand)]
    pub command: VideoCommand,
}

/// Video subcommands
#[derive(Debug, Subcommand)]
pub enum VideoCommand {
    /// Upload a video as the active version of a gloss
    Upload {
        /// Gloss ID
        gloss: GlossId,
        /// File to upload (moved into storage)
        file: PathBuf,
    },
    /// Move a video one version closer to active; deletes an active video
    Revert {
        /// Video ID
        id: VideoId,
    },
    /// Undo the last upload of a gloss
    Restore {
        /// Gloss ID
        gloss: GlossId,
    },
    /// Delete a video and its derived files
    Delete {
        /// Video ID
        id: VideoId,
    },
    /// Recompute a video's path from its gloss
    Relocate {
        /// Video ID
        id: VideoId,
        /// Also move the files
        #[arg(long = "move")]
        move_files: bool,
    },
    /// List videos
    List {
        /// Only videos of this gloss
        #[arg(short, long)]
        gloss: Option<GlossId>,
    },
    /// Show one video
    Show {
        /// Video ID
        id: VideoId,
    },
    /// Show the video history of a gloss
    History {
        /// Gloss ID
        gloss: GlossId,
    },
    /// Return a video's poster, extracting it if missing
    Poster {
        /// Video ID
        id: VideoId,
    },
    /// Return a video's small preview, encoding it if missing
    Small {
        /// Video ID
        id: VideoId,
    },
}

/// Video display row for table output
#[derive(Debug, Serialize, Tabled)]
struct VideoRow {
    /// Video ID
    id: String,
    /// Gloss ID
    gloss: i64,
    /// Version
    version: u32,
    /// Stored path
    videofile: String,
    /// Poster generated
    poster: bool,
    /// Small preview generated
    small: bool,
    /// Updated at
    updated_at: String,
}

impl From<&GlossVideo> for VideoRow {
    fn from(v: &GlossVideo) -> Self {
        Self {
            id: v.id.to_string(),
            gloss: v.gloss_id.get(),
            version: v.version,
            videofile: v.videofile.clone(),
            poster: v.poster.generated,
            small: v.small.generated,
            updated_at: v.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// History display row for table output
#[derive(Debug, Serialize, Tabled)]
struct HistoryRow {
    /// When
    datestamp: String,
    /// Action
    action: String,
    /// Actor
    actor: String,
    /// Uploaded from
    uploadfile: String,
    /// Target location
    goal_location: String,
}

impl From<&GlossVideoHistory> for HistoryRow {
    fn from(h: &GlossVideoHistory) -> Self {
        Self {
            datestamp: h.datestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            action: h.action.to_string(),
            actor: h.actor.clone(),
            uploadfile: h.uploadfile.clone(),
            goal_location: h.goal_location.clone(),
        }
    }
}

/// Execute video commands
pub async fn execute(
    args: &VideoArgs,
    store: &MediaStore,
    ctx: &ActorContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        VideoCommand::Upload { gloss, file } => {
            let video = store.versions.rotate_in(ctx, *gloss, file).await?;
            store.save_state().await?;
            output::print_item(&VideoRow::from(&video), format);
        }
        VideoCommand::Revert { id } => {
            let outcome = store.versions.revert(ctx, *id).await?;
            store.save_state().await?;
            match &outcome {
                RevertOutcome::Reverted(video) => output::print_success(&format!(
                    "Video {id} is now version {} at {}",
                    video.version, video.videofile
                )),
                RevertOutcome::Deleted(video) => {
                    output::print_success(&format!("Video {id} deleted ({})", video.videofile))
                }
            }
        }
        VideoCommand::Restore { gloss } => {
            let active = store.versions.restore_previous(ctx, *gloss).await?;
            store.save_state().await?;
            match active {
                Some(video) => output::print_item(&VideoRow::from(&video), format),
                None => output::print_warning(&format!("Gloss {gloss} has no video left")),
            }
        }
        VideoCommand::Delete { id } => {
            let video = store.versions.delete_video(ctx, *id).await?;
            store.save_state().await?;
            output::print_success(&format!("Video {id} deleted ({})", video.videofile));
        }
        VideoCommand::Relocate { id, move_files } => {
            match store.relocation.relocate(ctx, *id, *move_files).await? {
                Some(video) => {
                    store.save_state().await?;
                    output::print_item(&VideoRow::from(&video), format);
                }
                None => output::print_success(&format!("Video {id} is already in place")),
            }
        }
        VideoCommand::List { gloss } => {
            let videos = match gloss {
                Some(g) => store.catalog.for_gloss(*g).await,
                None => store.catalog.all().await,
            };
            let rows: Vec<VideoRow> = videos.iter().map(VideoRow::from).collect();
            output::print_list(&rows, format);
        }
        VideoCommand::Show { id } => {
            let video = store.catalog.get(*id).await?;
            output::print_item(&VideoRow::from(&video), format);
        }
        VideoCommand::History { gloss } => {
            let rows: Vec<HistoryRow> = store
                .catalog
                .history(*gloss)
                .await
                .iter()
                .map(HistoryRow::from)
                .collect();
            output::print_list(&rows, format);
        }
        VideoCommand::Poster { id } => {
            let path = store.artifacts.ensure_poster(*id).await?;
            store.save_state().await?;
            print_artifact("poster", path, store);
        }
        VideoCommand::Small { id } => {
            let path = store.artifacts.ensure_small(*id).await?;
            store.save_state().await?;
            print_artifact("small video", path, store);
        }
    }

    Ok(())
}

fn print_artifact(what: &str, path: Option<String>, store: &MediaStore) {
    match path {
        Some(p) => println!("{}", store.storage.absolute_path(&p).display()),
        None => output::print_warning(&format!("No {what} available")),
    }
}
