//! Gloss management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use glossvideo_core::error::AppError;
use glossvideo_core::events::{DomainEvent, GlossEvent};
use glossvideo_core::types::{DatasetId, GlossId};
use glossvideo_entity::Gloss;
use glossvideo_service::{ActorContext, MediaStore};

use crate::output::{self, OutputFormat};

/// Arguments for gloss commands
#[derive(Debug, Args)]
pub struct GlossArgs {
    /// Gloss subcommand
    #[command(subcommand)]
    pub command: GlossCommand,
}

/// Gloss subcommands
#[derive(Debug, Subcommand)]
pub enum GlossCommand {
    /// Register a gloss
    Add {
        /// Gloss ID
        id: GlossId,
        /// Dataset ID
        dataset: DatasetId,
        /// Idgloss in the dataset's default language
        idgloss: String,
        /// Language of the idgloss (defaults to the dataset's)
        #[arg(short, long)]
        language: Option<String>,
    },
    /// Change an idgloss translation, moving the gloss's videos
    Rename {
        /// Gloss ID
        id: GlossId,
        /// New idgloss
        idgloss: String,
        /// Language of the idgloss (defaults to the dataset's)
        #[arg(short, long)]
        language: Option<String>,
    },
    /// List glosses
    List {
        /// Only glosses of this dataset
        #[arg(short, long)]
        dataset: Option<DatasetId>,
    },
}

/// Gloss display row for table output
#[derive(Debug, Serialize, Tabled)]
struct GlossRow {
    /// Gloss ID
    id: i64,
    /// Dataset ID
    dataset: i64,
    /// Translations as `lang=text`
    translations: String,
}

impl From<&Gloss> for GlossRow {
    fn from(g: &Gloss) -> Self {
        Self {
            id: g.id.get(),
            dataset: g.dataset_id.get(),
            translations: g
                .translations
                .iter()
                .map(|(lang, text)| format!("{lang}={text}"))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Execute gloss commands
pub async fn execute(
    args: &GlossArgs,
    store: &MediaStore,
    ctx: &ActorContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        GlossCommand::Add {
            id,
            dataset,
            idgloss,
            language,
        } => {
            let language = match language {
                Some(l) => l.clone(),
                None => store.registry.dataset(*dataset).await?.default_language,
            };
            let gloss = Gloss::new(*id, *dataset).with_translation(language, idgloss.as_str());
            store.registry.add_gloss(gloss.clone()).await?;
            store.save_state().await?;
            output::print_item(&GlossRow::from(&gloss), format);
        }
        GlossCommand::Rename {
            id,
            idgloss,
            language,
        } => {
            let gloss = store.registry.gloss(*id).await?;
            let language = match language {
                Some(l) => l.clone(),
                None => store.registry.dataset(gloss.dataset_id).await?.default_language,
            };
            let event = DomainEvent::new(
                Some(ctx.actor.clone()),
                GlossEvent::IdglossChanged {
                    gloss_id: *id,
                    old_idgloss: gloss.translations.get(&language).cloned(),
                    language,
                    new_idgloss: idgloss.clone(),
                },
            );
            store.event_handler().handle(&event).await?;
            store.save_state().await?;
            output::print_success(&format!("Gloss {id} renamed to '{idgloss}'"));
        }
        GlossCommand::List { dataset } => {
            let rows: Vec<GlossRow> = store
                .registry
                .glosses()
                .await
                .iter()
                .filter(|g| dataset.is_none_or(|d| g.dataset_id == d))
                .map(GlossRow::from)
                .collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}
