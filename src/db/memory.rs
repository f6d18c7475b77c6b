use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use crate::bot::error::Error;
use crate::db::models::FloodRecord;
use crate::db::store::{FloodStore, LocaleStore};
use crate::i18n::Locale;

/// Process-local store. Each chat's record sits behind its map shard lock,
/// which serializes counter updates for that chat.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// chat_id -> flood record
    records: DashMap<i64, FloodRecord>,
    /// chat_id -> chosen language
    locales: DashMap<i64, Locale>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FloodStore for MemoryStore {
    async fn get_limit(&self, chat_id: i64) -> Result<u32, Error> {
        Ok(self
            .records
            .get(&chat_id)
            .map(|record| record.limit())
            .unwrap_or(0))
    }

    async fn set_limit(&self, chat_id: i64, limit: u32) -> Result<(), Error> {
        self.records
            .entry(chat_id)
            .or_insert_with(|| FloodRecord::new(chat_id))
            .set_limit(limit);
        Ok(())
    }

    async fn update_counter(&self, chat_id: i64, sender: Option<i64>) -> Result<bool, Error> {
        let mut record = self
            .records
            .entry(chat_id)
            .or_insert_with(|| FloodRecord::new(chat_id));
        Ok(record.advance(sender))
    }

    async fn migrate(&self, old_chat_id: i64, new_chat_id: i64) -> Result<(), Error> {
        if old_chat_id == new_chat_id {
            return Ok(());
        }

        if let Some((_, mut record)) = self.records.remove(&old_chat_id) {
            record.chat_id = new_chat_id;
            record.updated_at = Utc::now();
            self.records.insert(new_chat_id, record);
        }
        Ok(())
    }

    async fn get_state(&self, chat_id: i64) -> Result<Option<FloodRecord>, Error> {
        Ok(self.records.get(&chat_id).map(|record| record.clone()))
    }
}

#[async_trait]
impl LocaleStore for MemoryStore {
    async fn get_locale(&self, chat_id: i64) -> Result<Option<Locale>, Error> {
        Ok(self.locales.get(&chat_id).map(|locale| *locale))
    }

    async fn set_locale(&self, chat_id: i64, locale: Locale) -> Result<(), Error> {
        self.locales.insert(chat_id, locale);
        Ok(())
    }

    async fn migrate_locale(&self, old_chat_id: i64, new_chat_id: i64) -> Result<(), Error> {
        if old_chat_id == new_chat_id {
            return Ok(());
        }

        if let Some((_, locale)) = self.locales.remove(&old_chat_id) {
            self.locales.insert(new_chat_id, locale);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use tokio_test::block_on;

    use super::*;

    #[test]
    fn test_unconfigured_chat_is_disabled() {
        let store = MemoryStore::new();

        assert_eq!(block_on(store.get_limit(1)).unwrap(), 0);
        assert!(block_on(store.get_state(1)).unwrap().is_none());
        assert!(!block_on(store.update_counter(1, Some(5))).unwrap());
        // First check creates the record lazily
        assert!(block_on(store.get_state(1)).unwrap().is_some());
    }

    #[test]
    fn test_set_limit_round_trip() {
        let store = MemoryStore::new();

        block_on(store.set_limit(1, 7)).unwrap();
        assert_eq!(block_on(store.get_limit(1)).unwrap(), 7);

        block_on(store.set_limit(1, 0)).unwrap();
        assert_eq!(block_on(store.get_limit(1)).unwrap(), 0);
    }

    #[test]
    fn test_migrate_moves_limit_and_counter() {
        let store = MemoryStore::new();
        block_on(store.set_limit(-10, 4)).unwrap();
        block_on(store.update_counter(-10, Some(5))).unwrap();
        block_on(store.update_counter(-10, Some(5))).unwrap();
        block_on(store.set_limit(-20, 9)).unwrap();

        block_on(store.migrate(-10, -20)).unwrap();

        assert!(block_on(store.get_state(-10)).unwrap().is_none());
        assert_eq!(block_on(store.get_limit(-10)).unwrap(), 0);

        let moved = block_on(store.get_state(-20)).unwrap().unwrap();
        assert_eq!(moved.chat_id, -20);
        assert_eq!(moved.limit(), 4);
        assert_eq!(moved.count(), 2);
        assert_eq!(moved.last_user_id, Some(5));

        // The streak continues under the new id
        assert!(!block_on(store.update_counter(-20, Some(5))).unwrap());
        assert!(block_on(store.update_counter(-20, Some(5))).unwrap());
    }

    #[test]
    fn test_migrate_without_old_record_keeps_new() {
        let store = MemoryStore::new();
        block_on(store.set_limit(-20, 6)).unwrap();

        block_on(store.migrate(-10, -20)).unwrap();

        assert_eq!(block_on(store.get_limit(-20)).unwrap(), 6);
    }

    #[test]
    fn test_locale_migration() {
        let store = MemoryStore::new();
        block_on(store.set_locale(-10, Locale::De)).unwrap();

        block_on(store.migrate_locale(-10, -20)).unwrap();

        assert_eq!(block_on(store.get_locale(-10)).unwrap(), None);
        assert_eq!(block_on(store.get_locale(-20)).unwrap(), Some(Locale::De));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_are_not_lost() {
        let store = Arc::new(MemoryStore::new());
        store.set_limit(1, 5).await.unwrap();
        let trips = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..100 {
            let store = store.clone();
            let trips = trips.clone();
            handles.push(tokio::spawn(async move {
                if store.update_counter(1, Some(9)).await.unwrap() {
                    trips.fetch_add(1, Ordering::SeqCst);
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(trips.load(Ordering::SeqCst), 20);
        assert_eq!(store.get_state(1).await.unwrap().unwrap().count(), 0);
    }
}
