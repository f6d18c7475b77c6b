//! Test doubles for the flood services.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::bot::error::Error;
use crate::db::memory::MemoryStore;
use crate::i18n::{BundledStrings, ChatTexts, Locale};
use crate::services::flood::detector::FloodDetector;
use crate::services::flood::executor::ActionExecutor;
use crate::services::flood::ports::{
    AdminGate, ChatRef, MessageEvent, MessageRef, ModerationTransport, RemovalOutcome, Sender,
};
use crate::services::flood::service::AntiFlood;
use crate::services::flood::settings::FloodConfig;

pub const CHAT: i64 = -1001;
pub const ALICE: i64 = 11;
pub const BOB: i64 = 12;
pub const ADMIN: i64 = 99;

pub fn sender(id: i64) -> Sender {
    Sender {
        id,
        display_name: format!("user{}", id),
    }
}

pub fn chat() -> ChatRef {
    ChatRef {
        id: CHAT,
        title: "Test *Chat*".to_string(),
    }
}

pub fn event(user_id: i64) -> MessageEvent {
    event_in(CHAT, Some(user_id))
}

pub fn event_in(chat_id: i64, user_id: Option<i64>) -> MessageEvent {
    MessageEvent {
        chat: ChatRef {
            id: chat_id,
            title: "Test *Chat*".to_string(),
        },
        sender: user_id.map(sender),
        reply_to: MessageRef {
            channel_id: 500,
            message_id: 600,
        },
    }
}

/// Grants admin and restrict rights to a fixed set of users in every chat
#[derive(Debug, Default)]
pub struct StaticGate {
    admins: Mutex<HashSet<i64>>,
    restrictors: Mutex<HashSet<i64>>,
}

impl StaticGate {
    pub fn grant_admin(&self, user_id: i64) {
        self.admins.lock().unwrap().insert(user_id);
    }

    pub fn grant_restrict(&self, user_id: i64) {
        self.restrictors.lock().unwrap().insert(user_id);
    }
}

#[async_trait]
impl AdminGate for StaticGate {
    async fn is_admin(&self, _chat_id: i64, user_id: i64) -> bool {
        self.admins.lock().unwrap().contains(&user_id)
    }

    async fn can_restrict(&self, _chat_id: i64, user_id: i64) -> bool {
        self.restrictors.lock().unwrap().contains(&user_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RemovalBehavior {
    Allow,
    Deny,
    Fail,
}

/// Records every outbound action
#[derive(Debug)]
pub struct RecordingTransport {
    behavior: Mutex<RemovalBehavior>,
    fail_replies: Mutex<bool>,
    attempts: Mutex<usize>,
    removed: Mutex<Vec<(i64, i64)>>,
    replies: Mutex<Vec<String>>,
    logs: Mutex<Vec<(i64, String)>>,
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self {
            behavior: Mutex::new(RemovalBehavior::Allow),
            fail_replies: Mutex::new(false),
            attempts: Mutex::new(0),
            removed: Mutex::new(Vec::new()),
            replies: Mutex::new(Vec::new()),
            logs: Mutex::new(Vec::new()),
        }
    }
}

impl RecordingTransport {
    pub fn deny_removals(&self) {
        *self.behavior.lock().unwrap() = RemovalBehavior::Deny;
    }

    pub fn fail_removals(&self) {
        *self.behavior.lock().unwrap() = RemovalBehavior::Fail;
    }

    pub fn fail_replies(&self) {
        *self.fail_replies.lock().unwrap() = true;
    }

    pub fn removal_attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }

    pub fn removed(&self) -> Vec<(i64, i64)> {
        self.removed.lock().unwrap().clone()
    }

    pub fn replies(&self) -> Vec<String> {
        self.replies.lock().unwrap().clone()
    }

    pub fn logs(&self) -> Vec<(i64, String)> {
        self.logs.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModerationTransport for RecordingTransport {
    async fn remove_member(&self, chat_id: i64, user_id: i64) -> Result<RemovalOutcome, Error> {
        *self.attempts.lock().unwrap() += 1;

        let behavior = *self.behavior.lock().unwrap();
        match behavior {
            RemovalBehavior::Allow => {
                self.removed.lock().unwrap().push((chat_id, user_id));
                Ok(RemovalOutcome::Removed)
            }
            RemovalBehavior::Deny => Ok(RemovalOutcome::PermissionDenied),
            RemovalBehavior::Fail => Err(Error::transport("gateway unavailable")),
        }
    }

    async fn reply(&self, _target: MessageRef, text: &str) -> Result<(), Error> {
        if *self.fail_replies.lock().unwrap() {
            return Err(Error::transport("reply rejected"));
        }
        self.replies.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn log_action(&self, chat_id: i64, text: &str) -> Result<(), Error> {
        self.logs.lock().unwrap().push((chat_id, text.to_string()));
        Ok(())
    }
}

/// In-memory wiring of every flood component
pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub gate: Arc<StaticGate>,
    pub transport: Arc<RecordingTransport>,
}

impl Harness {
    pub fn new() -> Self {
        let gate = StaticGate::default();
        gate.grant_admin(ADMIN);
        gate.grant_restrict(ADMIN);

        Self {
            store: Arc::new(MemoryStore::new()),
            gate: Arc::new(gate),
            transport: Arc::new(RecordingTransport::default()),
        }
    }

    pub fn texts(&self) -> ChatTexts {
        let strings = BundledStrings::bundled().unwrap();
        ChatTexts::new(Arc::new(strings), self.store.clone(), Locale::En)
    }

    pub fn executor(&self) -> ActionExecutor {
        ActionExecutor::new(self.store.clone(), self.transport.clone(), self.texts())
    }

    pub fn detector(&self) -> FloodDetector {
        FloodDetector::new(self.store.clone(), self.gate.clone(), self.executor())
    }

    pub fn config(&self) -> FloodConfig {
        FloodConfig::new(self.store.clone(), self.gate.clone(), self.texts())
    }

    pub fn antiflood(&self) -> AntiFlood {
        AntiFlood::new(
            self.store.clone(),
            self.store.clone(),
            self.gate.clone(),
            self.transport.clone(),
            self.texts(),
        )
    }
}
