//! In-process event bus and the handler reacting to metadata changes.

use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use glossvideo_core::events::{DomainEvent, GlossEvent};
use glossvideo_core::result::AppResult;

use crate::context::ActorContext;
use crate::video::RelocationService;

/// Default number of buffered events per subscriber.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Broadcasts domain events to every subscriber.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    /// Create a bus buffering up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event. Having no subscribers is fine.
    pub fn publish(&self, actor: Option<String>, payload: GlossEvent) {
        let event = DomainEvent::new(actor, payload);
        debug!(event_id = %event.id, "Publishing event");
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

/// Routes dictionary metadata changes to the relocation service.
#[derive(Debug, Clone)]
pub struct EventHandler {
    relocation: RelocationService,
}

impl EventHandler {
    /// Creates a new handler.
    pub fn new(relocation: RelocationService) -> Self {
        Self { relocation }
    }

    /// Handle one event. Events that do not affect file locations are ignored.
    pub async fn handle(&self, event: &DomainEvent) -> AppResult<()> {
        let ctx = event
            .actor
            .as_deref()
            .map(ActorContext::new)
            .unwrap_or_else(ActorContext::system);

        match &event.payload {
            GlossEvent::DatasetAcronymChanged {
                dataset_id,
                old_acronym,
                new_acronym,
            } => {
                self.relocation
                    .on_dataset_acronym_changed(&ctx, *dataset_id, old_acronym, new_acronym)
                    .await?;
            }
            GlossEvent::DatasetLanguageChanged {
                dataset_id,
                old_language,
                new_language,
            } => {
                self.relocation
                    .on_default_language_changed(&ctx, *dataset_id, old_language, new_language)
                    .await?;
            }
            GlossEvent::IdglossChanged {
                gloss_id,
                language,
                new_idgloss,
                ..
            } => {
                self.relocation
                    .on_idgloss_changed(&ctx, *gloss_id, language, new_idgloss)
                    .await?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Consume events until the bus is dropped. Handler failures are
    /// logged and do not stop the loop.
    pub async fn run(self, mut receiver: broadcast::Receiver<DomainEvent>) {
        info!("Event handler started");
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if !event.payload.is_relocation_trigger() {
                        continue;
                    }
                    if let Err(e) = self.handle(&event).await {
                        error!(event_id = %event.id, error = %e, "Event handling failed");
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Event handler lagged behind");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        info!("Event handler stopped");
    }
}
