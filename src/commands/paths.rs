//! Path derivation CLI command.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use glossvideo_core::error::AppError;
use glossvideo_core::types::GlossId;
use glossvideo_service::MediaStore;
use glossvideo_storage::paths::small_variant_path;

use crate::output::{self, OutputFormat};

/// Arguments for the paths command
#[derive(Debug, Args)]
pub struct PathsArgs {
    /// Gloss ID
    pub gloss: GlossId,

    /// Backup version
    #[arg(short, long, default_value_t = 0)]
    pub version: u32,
}

/// Derived paths of one gloss video slot
#[derive(Debug, Serialize, Tabled)]
struct PathsRow {
    /// Video path
    video: String,
    /// Small preview path
    small: String,
    /// Poster path
    poster: String,
}

/// Execute the paths command
pub async fn execute(
    args: &PathsArgs,
    store: &MediaStore,
    format: OutputFormat,
) -> Result<(), AppError> {
    let owner = store.registry.owner(args.gloss).await?;
    let video = store.layout.video_file_path(&owner, args.version);
    let row = PathsRow {
        small: small_variant_path(&video),
        poster: store.layout.poster_path(&video),
        video,
    };

    match format {
        OutputFormat::Table => {
            output::print_kv("idgloss", &owner.idgloss);
            output::print_kv("dataset", &owner.dataset_acronym);
            output::print_kv("video", &row.video);
            output::print_kv("small", &row.small);
            output::print_kv("poster", &row.poster);
        }
        OutputFormat::Json => output::print_item(&row, format),
    }
    Ok(())
}
