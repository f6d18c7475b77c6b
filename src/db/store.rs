//! Persistence contract of the flood module.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::bot::error::Error;
use crate::db::memory::MemoryStore;
use crate::db::models::FloodRecord;
use crate::db::postgres::PgStore;
use crate::i18n::Locale;

/// Flood limits and counters, one record per chat
#[async_trait]
pub trait FloodStore: Send + Sync {
    /// Current limit, 0 for chats never configured
    async fn get_limit(&self, chat_id: i64) -> Result<u32, Error>;

    /// Store a new limit; any running streak is dropped
    async fn set_limit(&self, chat_id: i64, limit: u32) -> Result<(), Error>;

    /// Count one message under the chat's lock and report whether it tripped.
    /// Implementations must run [`FloodRecord::advance`] against the limit
    /// stored at that moment, serialized per chat.
    async fn update_counter(&self, chat_id: i64, sender: Option<i64>) -> Result<bool, Error>;

    /// Move the record of `old_chat_id` to `new_chat_id`, replacing whatever
    /// the new id held. No-op when the old id has no record.
    async fn migrate(&self, old_chat_id: i64, new_chat_id: i64) -> Result<(), Error>;

    async fn get_state(&self, chat_id: i64) -> Result<Option<FloodRecord>, Error>;
}

/// Per-chat language preference
#[async_trait]
pub trait LocaleStore: Send + Sync {
    async fn get_locale(&self, chat_id: i64) -> Result<Option<Locale>, Error>;

    async fn set_locale(&self, chat_id: i64, locale: Locale) -> Result<(), Error>;

    async fn migrate_locale(&self, old_chat_id: i64, new_chat_id: i64) -> Result<(), Error>;
}

/// Store handles shared by the flood and language services
#[derive(Clone)]
pub struct Stores {
    pub flood: Arc<dyn FloodStore>,
    pub locales: Arc<dyn LocaleStore>,
}

impl Stores {
    pub fn postgres(pool: PgPool) -> Self {
        let store = Arc::new(PgStore::new(pool));
        Self {
            flood: store.clone(),
            locales: store,
        }
    }

    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            flood: store.clone(),
            locales: store,
        }
    }
}
