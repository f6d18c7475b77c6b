use std::sync::Arc;

use tracing::debug;

use crate::bot::error::Error;
use crate::db::store::FloodStore;
use crate::services::flood::executor::ActionExecutor;
use crate::services::flood::ports::{AdminGate, MessageEvent, Sender};

/// How a single message was classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FloodVerdict {
    /// Not authored by an identifiable user
    Ignored,
    /// Authored by an admin; any running streak was broken
    AdminReset,
    /// Counted without reaching the limit
    Passed,
    /// The sender reached the limit with this message
    Tripped(Sender),
}

/// Watches every chat message and hands trips to the [`ActionExecutor`].
/// It never holds a message back; it only reacts after the fact.
#[derive(Clone)]
pub struct FloodDetector {
    store: Arc<dyn FloodStore>,
    gate: Arc<dyn AdminGate>,
    executor: ActionExecutor,
}

impl FloodDetector {
    pub fn new(
        store: Arc<dyn FloodStore>,
        gate: Arc<dyn AdminGate>,
        executor: ActionExecutor,
    ) -> Self {
        Self {
            store,
            gate,
            executor,
        }
    }

    /// Process one message. Returns the audit line when an action was taken.
    pub async fn on_message(&self, event: &MessageEvent) -> Result<Option<String>, Error> {
        match self.classify(event).await? {
            FloodVerdict::Tripped(sender) => {
                let audit = self.executor.enforce(event, &sender).await?;
                Ok(Some(audit))
            }
            FloodVerdict::Ignored | FloodVerdict::AdminReset | FloodVerdict::Passed => Ok(None),
        }
    }

    /// Advance the chat's counter for this message
    pub async fn classify(&self, event: &MessageEvent) -> Result<FloodVerdict, Error> {
        let Some(sender) = &event.sender else {
            return Ok(FloodVerdict::Ignored);
        };
        let chat_id = event.chat_id();

        if self.gate.is_admin(chat_id, sender.id).await {
            // Exempts the admin and breaks the streak in one store call
            self.store.update_counter(chat_id, None).await?;
            return Ok(FloodVerdict::AdminReset);
        }

        if self.store.update_counter(chat_id, Some(sender.id)).await? {
            debug!("User {} tripped the flood limit in chat {}", sender.id, chat_id);
            Ok(FloodVerdict::Tripped(sender.clone()))
        } else {
            Ok(FloodVerdict::Passed)
        }
    }
}
