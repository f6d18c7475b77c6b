use std::sync::Arc;

use tracing::info;

use crate::bot::error::Error;
use crate::constants::flood::{
    ANTIFLOOD_MODULE, DISABLE_WORDS, FLOOD_DISABLED, MAX_FLOOD_LIMIT, MIN_FLOOD_LIMIT,
};
use crate::db::store::FloodStore;
use crate::i18n::ChatTexts;
use crate::services::flood::ports::{AdminGate, ChatRef, Sender};
use crate::utils::formatting::{escape_markdown, mention_user};

/// Parsed `/setflood` argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloodArgument {
    /// `off`, `no` or `0`
    Off,
    /// Any other run of ASCII digits
    Number(u32),
    Malformed,
}

impl FloodArgument {
    pub fn parse(arg: &str) -> Self {
        let value = arg.trim().to_lowercase();

        if DISABLE_WORDS.contains(&value.as_str()) {
            return FloodArgument::Off;
        }

        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            return FloodArgument::Malformed;
        }

        match value.parse::<u32>() {
            Ok(n) if n <= MAX_FLOOD_LIMIT => FloodArgument::Number(n),
            _ => FloodArgument::Malformed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetFloodOutcome {
    /// Caller lacks admin or restrict rights; nothing changed
    Unauthorized,
    /// No argument given; nothing changed
    Missing,
    /// Disabled through `off`/`no`/`0`
    Disabled,
    /// Disabled through a numeric zero such as `00`
    DisabledNumeric,
    Updated(u32),
    /// 1 or 2; nothing changed
    TooLow,
    Malformed,
}

impl SetFloodOutcome {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            SetFloodOutcome::Disabled | SetFloodOutcome::DisabledNumeric | SetFloodOutcome::Updated(_)
        )
    }
}

/// Chat reply and audit line produced by `/setflood`
#[derive(Debug, Clone)]
pub struct SetFloodResponse {
    pub outcome: SetFloodOutcome,
    pub reply: Option<String>,
    pub audit: Option<String>,
}

/// Admin surface for viewing and changing a chat's flood limit
#[derive(Clone)]
pub struct FloodConfig {
    store: Arc<dyn FloodStore>,
    gate: Arc<dyn AdminGate>,
    texts: ChatTexts,
}

impl FloodConfig {
    pub fn new(store: Arc<dyn FloodStore>, gate: Arc<dyn AdminGate>, texts: ChatTexts) -> Self {
        Self { store, gate, texts }
    }

    pub async fn set_flood(
        &self,
        chat: &ChatRef,
        args: &str,
        user: &Sender,
    ) -> Result<SetFloodResponse, Error> {
        let authorized = self.gate.is_admin(chat.id, user.id).await
            && self.gate.can_restrict(chat.id, user.id).await;
        if !authorized {
            return Ok(SetFloodResponse {
                outcome: SetFloodOutcome::Unauthorized,
                reply: None,
                audit: None,
            });
        }

        let Some(arg) = args.split_whitespace().next() else {
            return Ok(SetFloodResponse {
                outcome: SetFloodOutcome::Missing,
                reply: None,
                audit: None,
            });
        };

        let outcome = match FloodArgument::parse(arg) {
            FloodArgument::Off => SetFloodOutcome::Disabled,
            FloodArgument::Number(0) => SetFloodOutcome::DisabledNumeric,
            FloodArgument::Number(n) if n < MIN_FLOOD_LIMIT => SetFloodOutcome::TooLow,
            FloodArgument::Number(n) => SetFloodOutcome::Updated(n),
            FloodArgument::Malformed => SetFloodOutcome::Malformed,
        };

        match outcome {
            SetFloodOutcome::Disabled | SetFloodOutcome::DisabledNumeric => {
                self.store.set_limit(chat.id, FLOOD_DISABLED).await?;
                info!("User {} disabled flood protection in chat {}", user.id, chat.id);
            }
            SetFloodOutcome::Updated(limit) => {
                self.store.set_limit(chat.id, limit).await?;
                info!("User {} set flood limit {} in chat {}", user.id, limit, chat.id);
            }
            _ => {}
        }

        self.respond(chat, user, outcome).await
    }

    async fn respond(
        &self,
        chat: &ChatRef,
        user: &Sender,
        outcome: SetFloodOutcome,
    ) -> Result<SetFloodResponse, Error> {
        let locale = self.texts.locale(chat.id).await?;
        let title = escape_markdown(&chat.title);
        let mention = mention_user(user.id);

        let text = |key: &'static str| self.texts.render_in(locale, ANTIFLOOD_MODULE, key, &[]);

        let (reply, audit) = match outcome {
            SetFloodOutcome::Unauthorized | SetFloodOutcome::Missing => (None, None),
            SetFloodOutcome::Disabled => (Some(text("disabled")), None),
            SetFloodOutcome::DisabledNumeric => {
                let audit = self.texts.render_in(
                    locale,
                    ANTIFLOOD_MODULE,
                    "disabled_log",
                    &[&title, &mention],
                );
                (Some(text("disabled")), Some(audit))
            }
            SetFloodOutcome::Updated(limit) => {
                let reply = self
                    .texts
                    .render_in(locale, ANTIFLOOD_MODULE, "success", &[&limit]);
                let audit = self.texts.render_in(
                    locale,
                    ANTIFLOOD_MODULE,
                    "success_log",
                    &[&title, &mention, &limit],
                );
                (Some(reply), Some(audit))
            }
            SetFloodOutcome::TooLow => (Some(text("bad_amount")), None),
            SetFloodOutcome::Malformed => (Some(text("bad_request")), None),
        };

        Ok(SetFloodResponse {
            outcome,
            reply,
            audit,
        })
    }

    /// Current setting as a chat reply
    pub async fn flood_status(&self, chat_id: i64) -> Result<String, Error> {
        let limit = self.store.get_limit(chat_id).await?;
        if limit == FLOOD_DISABLED {
            self.texts.render(chat_id, ANTIFLOOD_MODULE, "disabled", &[]).await
        } else {
            self.texts.render(chat_id, ANTIFLOOD_MODULE, "info", &[&limit]).await
        }
    }

    /// One line for the chat settings overview
    pub async fn chat_settings(&self, chat_id: i64) -> Result<String, Error> {
        let limit = self.store.get_limit(chat_id).await?;
        if limit == FLOOD_DISABLED {
            self.texts.render(chat_id, ANTIFLOOD_MODULE, "settings_off", &[]).await
        } else {
            self.texts.render(chat_id, ANTIFLOOD_MODULE, "settings_on", &[&limit]).await
        }
    }

    pub async fn help(&self, chat_id: i64) -> Result<String, Error> {
        self.texts.render(chat_id, ANTIFLOOD_MODULE, "help", &[]).await
    }
}
