use async_trait::async_trait;

use crate::bot::error::Error;

/// Author of a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub id: i64,
    pub display_name: String,
}

/// Chat a command or message belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRef {
    pub id: i64,
    pub title: String,
}

/// Where to answer a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRef {
    pub channel_id: i64,
    pub message_id: i64,
}

/// A chat message as seen by the flood detector. Service messages never
/// become events; `sender` is `None` for posts not authored by a user
/// (webhooks, channel posts).
#[derive(Debug, Clone)]
pub struct MessageEvent {
    pub chat: ChatRef,
    pub sender: Option<Sender>,
    pub reply_to: MessageRef,
}

impl MessageEvent {
    pub fn chat_id(&self) -> i64 {
        self.chat.id
    }
}

/// Result of a single removal attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalOutcome {
    Removed,
    /// The bot lacks the right to remove members in this chat
    PermissionDenied,
}

/// Chat role checks
#[async_trait]
pub trait AdminGate: Send + Sync {
    async fn is_admin(&self, chat_id: i64, user_id: i64) -> bool;

    async fn can_restrict(&self, chat_id: i64, user_id: i64) -> bool;
}

/// Outbound chat actions
#[async_trait]
pub trait ModerationTransport: Send + Sync {
    /// Remove a member once; errors other than missing permission are returned as `Err`
    async fn remove_member(&self, chat_id: i64, user_id: i64) -> Result<RemovalOutcome, Error>;

    async fn reply(&self, target: MessageRef, text: &str) -> Result<(), Error>;

    /// Record an audit line for a chat
    async fn log_action(&self, chat_id: i64, text: &str) -> Result<(), Error>;
}
