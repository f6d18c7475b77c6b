use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::bot::error::Error;
use crate::db::models::FloodRecord;
use crate::db::queries::{antiflood, locale};
use crate::db::store::{FloodStore, LocaleStore};
use crate::i18n::Locale;

/// Postgres-backed store. Counter updates hold a row lock for the
/// read-modify-write, so concurrent events of one chat serialize.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FloodStore for PgStore {
    async fn get_limit(&self, chat_id: i64) -> Result<u32, Error> {
        let limit = antiflood::get_limit(&self.pool, chat_id).await?;
        Ok(limit.map(|l| l.max(0) as u32).unwrap_or(0))
    }

    async fn set_limit(&self, chat_id: i64, limit: u32) -> Result<(), Error> {
        let limit = i32::try_from(limit)
            .map_err(|_| Error::InvalidOperation(format!("flood limit {} out of range", limit)))?;
        antiflood::set_limit(&self.pool, chat_id, limit).await?;
        Ok(())
    }

    async fn update_counter(&self, chat_id: i64, sender: Option<i64>) -> Result<bool, Error> {
        let mut tx = self.pool.begin().await?;

        let mut record = antiflood::lock_or_create(&mut *tx, chat_id).await?;
        let tripped = record.advance(sender);
        antiflood::save_counter(&mut *tx, &record).await?;

        tx.commit().await?;
        Ok(tripped)
    }

    async fn migrate(&self, old_chat_id: i64, new_chat_id: i64) -> Result<(), Error> {
        if old_chat_id == new_chat_id {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        let moved = antiflood::migrate(&mut *tx, old_chat_id, new_chat_id).await?;
        tx.commit().await?;

        debug!(
            "Flood record migration {} -> {} (moved: {})",
            old_chat_id, new_chat_id, moved
        );
        Ok(())
    }

    async fn get_state(&self, chat_id: i64) -> Result<Option<FloodRecord>, Error> {
        Ok(antiflood::get(&self.pool, chat_id).await?)
    }
}

#[async_trait]
impl LocaleStore for PgStore {
    async fn get_locale(&self, chat_id: i64) -> Result<Option<Locale>, Error> {
        let record = locale::get(&self.pool, chat_id).await?;
        Ok(record.map(|r| r.locale()))
    }

    async fn set_locale(&self, chat_id: i64, locale: Locale) -> Result<(), Error> {
        locale::set(&self.pool, chat_id, locale.code()).await?;
        Ok(())
    }

    async fn migrate_locale(&self, old_chat_id: i64, new_chat_id: i64) -> Result<(), Error> {
        if old_chat_id == new_chat_id {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        locale::migrate(&mut *tx, old_chat_id, new_chat_id).await?;
        tx.commit().await?;
        Ok(())
    }
}
