//! CLI command definitions and dispatch.

pub mod dataset;
pub mod gloss;
pub mod paths;
pub mod video;

use clap::{Parser, Subcommand};

use glossvideo_core::config::AppConfig;
use glossvideo_core::error::AppError;
use glossvideo_service::{ActorContext, MediaStore};

use crate::output::OutputFormat;

/// glossvideo: gloss video storage administration
#[derive(Debug, Parser)]
#[command(name = "glossvideo", version, about, long_about = None)]
pub struct Cli {
    /// Path to a configuration file (overrides `config/<env>.toml`)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Configuration environment
    #[arg(long, env = "GLOSSVIDEO_ENV", default_value = "development")]
    pub env: String,

    /// Name recorded in video history
    #[arg(short, long, env = "GLOSSVIDEO_ACTOR", default_value = "admin")]
    pub actor: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Dataset management
    Dataset(dataset::DatasetArgs),
    /// Gloss management
    Gloss(gloss::GlossArgs),
    /// Gloss video management
    Video(video::VideoArgs),
    /// Print the derived paths of a gloss
    Paths(paths::PathsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        let store = open_store(config).await?;
        let ctx = ActorContext::new(&self.actor);

        match &self.command {
            Commands::Dataset(args) => dataset::execute(args, &store, &ctx, self.format).await,
            Commands::Gloss(args) => gloss::execute(args, &store, &ctx, self.format).await,
            Commands::Video(args) => video::execute(args, &store, &ctx, self.format).await,
            Commands::Paths(args) => paths::execute(args, &store, self.format).await,
        }
    }
}

/// Helper: open the store and load its saved state
pub async fn open_store(config: &AppConfig) -> Result<MediaStore, AppError> {
    let store = MediaStore::open(config).await?;
    store.load_state().await?;
    Ok(store)
}
