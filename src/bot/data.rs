use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::warn;

use crate::config::Settings;
use crate::services::flood::{AntiFlood, MessageEvent, WorkerEvent};
use crate::services::language::LanguageSettings;

/// Shared data available to all commands and handlers
pub struct Data {
    pub settings: Settings,
    pub antiflood: Arc<AntiFlood>,
    pub language: LanguageSettings,
    /// Feeds the flood worker; owned here so the worker stops when the bot does
    flood_events: mpsc::UnboundedSender<WorkerEvent>,
}

impl Data {
    pub fn new(
        settings: Settings,
        antiflood: Arc<AntiFlood>,
        language: LanguageSettings,
        flood_events: mpsc::UnboundedSender<WorkerEvent>,
    ) -> Self {
        Self {
            settings,
            antiflood,
            language,
            flood_events,
        }
    }

    /// Queue a message for flood checking without waiting
    pub fn submit_message(&self, event: MessageEvent) {
        if self.flood_events.send(WorkerEvent::Message(event)).is_err() {
            warn!("Flood worker is gone, message not checked");
        }
    }

    /// Release the flood worker's resources for a chat the bot has left
    pub fn close_chat(&self, chat_id: i64) {
        if self.flood_events.send(WorkerEvent::ChatClosed(chat_id)).is_err() {
            warn!("Flood worker is gone, chat {} not closed", chat_id);
        }
    }
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Data")
            .field("guild_id", &self.settings.guild_id)
            .field("log_channel_id", &self.settings.log_channel_id)
            .finish_non_exhaustive()
    }
}

pub type Context<'a> = poise::Context<'a, Arc<Data>, crate::bot::error::Error>;
