//! Dataset management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use glossvideo_core::error::AppError;
use glossvideo_core::events::{DomainEvent, GlossEvent};
use glossvideo_core::types::DatasetId;
use glossvideo_entity::Dataset;
use glossvideo_service::{ActorContext, MediaStore};

use crate::output::{self, OutputFormat};

/// Arguments for dataset commands
#[derive(Debug, Args)]
pub struct DatasetArgs {
    /// Dataset subcommand
    #[command(subcommand)]
    pub command: DatasetCommand,
}

/// Dataset subcommands
#[derive(Debug, Subcommand)]
pub enum DatasetCommand {
    /// Register a dataset
    Add {
        /// Dataset ID
        id: DatasetId,
        /// Acronym, used as top-level directory
        acronym: String,
        /// Default language code
        #[arg(short, long, default_value = "en")]
        language: String,
    },
    /// Change a dataset's acronym, renaming its directories
    Rename {
        /// Dataset ID
        id: DatasetId,
        /// New acronym
        acronym: String,
    },
    /// Change a dataset's default language, moving every video
    Language {
        /// Dataset ID
        id: DatasetId,
        /// New default language code
        language: String,
    },
    /// List datasets
    List,
}

/// Dataset display row for table output
#[derive(Debug, Serialize, Tabled)]
struct DatasetRow {
    /// Dataset ID
    id: i64,
    /// Acronym
    acronym: String,
    /// Default language
    default_language: String,
}

impl From<&Dataset> for DatasetRow {
    fn from(d: &Dataset) -> Self {
        Self {
            id: d.id.get(),
            acronym: d.acronym.clone(),
            default_language: d.default_language.clone(),
        }
    }
}

/// Execute dataset commands
pub async fn execute(
    args: &DatasetArgs,
    store: &MediaStore,
    ctx: &ActorContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        DatasetCommand::Add {
            id,
            acronym,
            language,
        } => {
            let dataset = Dataset::new(*id, acronym.as_str(), language.as_str());
            store.registry.add_dataset(dataset.clone()).await?;
            store.save_state().await?;
            output::print_item(&DatasetRow::from(&dataset), format);
        }
        DatasetCommand::Rename { id, acronym } => {
            let current = store.registry.dataset(*id).await?;
            let event = DomainEvent::new(
                Some(ctx.actor.clone()),
                GlossEvent::DatasetAcronymChanged {
                    dataset_id: *id,
                    old_acronym: current.acronym.clone(),
                    new_acronym: acronym.clone(),
                },
            );
            store.event_handler().handle(&event).await?;
            store.save_state().await?;
            output::print_success(&format!(
                "Dataset {id} renamed from '{}' to '{acronym}'",
                current.acronym
            ));
        }
        DatasetCommand::Language { id, language } => {
            let current = store.registry.dataset(*id).await?;
            let event = DomainEvent::new(
                Some(ctx.actor.clone()),
                GlossEvent::DatasetLanguageChanged {
                    dataset_id: *id,
                    old_language: current.default_language.clone(),
                    new_language: language.clone(),
                },
            );
            store.event_handler().handle(&event).await?;
            store.save_state().await?;
            output::print_success(&format!(
                "Dataset {id} default language set to '{language}'"
            ));
        }
        DatasetCommand::List => {
            let rows: Vec<DatasetRow> = store
                .registry
                .datasets()
                .await
                .iter()
                .map(DatasetRow::from)
                .collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}
