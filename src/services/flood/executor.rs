use std::sync::Arc;

use tracing::{info, warn};

use crate::bot::error::Error;
use crate::constants::flood::{ANTIFLOOD_MODULE, FLOOD_DISABLED};
use crate::db::store::FloodStore;
use crate::i18n::ChatTexts;
use crate::services::flood::ports::{MessageEvent, ModerationTransport, RemovalOutcome, Sender};
use crate::utils::formatting::{escape_markdown, mention_user};

/// Carries out the removal once a sender trips the flood limit
#[derive(Clone)]
pub struct ActionExecutor {
    store: Arc<dyn FloodStore>,
    transport: Arc<dyn ModerationTransport>,
    texts: ChatTexts,
}

impl ActionExecutor {
    pub fn new(
        store: Arc<dyn FloodStore>,
        transport: Arc<dyn ModerationTransport>,
        texts: ChatTexts,
    ) -> Self {
        Self {
            store,
            transport,
            texts,
        }
    }

    /// Make one removal attempt and resolve it. Returns the audit line.
    pub async fn enforce(&self, event: &MessageEvent, sender: &Sender) -> Result<String, Error> {
        let outcome = self
            .transport
            .remove_member(event.chat_id(), sender.id)
            .await?;

        self.resolve(event, sender, outcome).await
    }

    async fn resolve(
        &self,
        event: &MessageEvent,
        sender: &Sender,
        outcome: RemovalOutcome,
    ) -> Result<String, Error> {
        let chat_id = event.chat_id();
        let title = escape_markdown(&event.chat.title);
        let mention = mention_user(sender.id);

        match outcome {
            RemovalOutcome::Removed => {
                info!(
                    "Removed user {} ({}) from chat {} for flooding",
                    sender.id, sender.display_name, chat_id
                );

                let reply = self
                    .texts
                    .render(chat_id, ANTIFLOOD_MODULE, "kicked", &[&mention])
                    .await?;
                self.notify(event, &reply).await;

                self.texts
                    .render(chat_id, ANTIFLOOD_MODULE, "kicked_log", &[&title, &mention])
                    .await
            }
            RemovalOutcome::PermissionDenied => {
                // Stop tripping until an admin re-enables it with the right permissions
                self.store.set_limit(chat_id, FLOOD_DISABLED).await?;

                warn!(
                    "Missing permission to remove user {} from chat {}, flood protection disabled",
                    sender.id, chat_id
                );

                let reply = self
                    .texts
                    .render(chat_id, ANTIFLOOD_MODULE, "no_perms", &[])
                    .await?;
                self.notify(event, &reply).await;

                self.texts
                    .render(chat_id, ANTIFLOOD_MODULE, "no_perms_log", &[&title])
                    .await
            }
        }
    }

    async fn notify(&self, event: &MessageEvent, text: &str) {
        if let Err(e) = self.transport.reply(event.reply_to, text).await {
            warn!("Failed to notify chat {}: {:?}", event.chat_id(), e);
        }
    }
}
