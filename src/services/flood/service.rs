use std::sync::Arc;

use tracing::{info, warn};

use crate::bot::error::Error;
use crate::constants::flood::ANTIFLOOD_MODULE;
use crate::db::store::{FloodStore, LocaleStore};
use crate::i18n::ChatTexts;
use crate::services::flood::detector::FloodDetector;
use crate::services::flood::executor::ActionExecutor;
use crate::services::flood::ports::{AdminGate, ChatRef, MessageEvent, ModerationTransport, Sender};
use crate::services::flood::settings::{FloodConfig, SetFloodResponse};

/// Entry point the host wires its events and commands into
#[derive(Clone)]
pub struct AntiFlood {
    detector: FloodDetector,
    config: FloodConfig,
    flood_store: Arc<dyn FloodStore>,
    locale_store: Arc<dyn LocaleStore>,
    transport: Arc<dyn ModerationTransport>,
    texts: ChatTexts,
}

impl AntiFlood {
    pub fn new(
        flood_store: Arc<dyn FloodStore>,
        locale_store: Arc<dyn LocaleStore>,
        gate: Arc<dyn AdminGate>,
        transport: Arc<dyn ModerationTransport>,
        texts: ChatTexts,
    ) -> Self {
        let executor = ActionExecutor::new(flood_store.clone(), transport.clone(), texts.clone());
        let detector = FloodDetector::new(flood_store.clone(), gate.clone(), executor);
        let config = FloodConfig::new(flood_store.clone(), gate, texts.clone());

        Self {
            detector,
            config,
            flood_store,
            locale_store,
            transport,
            texts,
        }
    }

    pub async fn on_message(&self, event: &MessageEvent) -> Result<Option<String>, Error> {
        self.detector.on_message(event).await
    }

    pub async fn set_flood(
        &self,
        chat: &ChatRef,
        args: &str,
        user: &Sender,
    ) -> Result<SetFloodResponse, Error> {
        self.config.set_flood(chat, args, user).await
    }

    pub async fn flood_status(&self, chat_id: i64) -> Result<String, Error> {
        self.config.flood_status(chat_id).await
    }

    pub async fn chat_settings(&self, chat_id: i64) -> Result<String, Error> {
        self.config.chat_settings(chat_id).await
    }

    pub async fn help(&self, chat_id: i64) -> Result<String, Error> {
        self.config.help(chat_id).await
    }

    /// Render an antiflood text for the chat's language
    pub async fn text(&self, chat_id: i64, key: &str) -> Result<String, Error> {
        self.texts.render(chat_id, ANTIFLOOD_MODULE, key, &[]).await
    }

    /// Carry a chat's flood record and language over to its new id
    pub async fn on_chat_migrate(&self, old_chat_id: i64, new_chat_id: i64) -> Result<(), Error> {
        self.flood_store.migrate(old_chat_id, new_chat_id).await?;
        self.locale_store
            .migrate_locale(old_chat_id, new_chat_id)
            .await?;

        info!("Migrated flood settings from chat {} to {}", old_chat_id, new_chat_id);
        Ok(())
    }

    /// Write an audit line to the log and the transport's audit channel
    pub async fn record_audit(&self, chat_id: i64, text: &str) {
        info!(chat_id, "{}", text.replace('\n', " | "));

        if let Err(e) = self.transport.log_action(chat_id, text).await {
            warn!("Failed to post audit line for chat {}: {:?}", chat_id, e);
        }
    }
}
