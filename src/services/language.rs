use std::sync::Arc;

use tracing::info;

use crate::bot::error::Error;
use crate::constants::flood::LANG_MODULE;
use crate::i18n::{ChatTexts, Locale};
use crate::services::flood::ports::{AdminGate, ChatRef, Sender};

/// Per-chat language selection
#[derive(Clone)]
pub struct LanguageSettings {
    gate: Arc<dyn AdminGate>,
    texts: ChatTexts,
}

impl LanguageSettings {
    pub fn new(gate: Arc<dyn AdminGate>, texts: ChatTexts) -> Self {
        Self { gate, texts }
    }

    /// Switch the chat's language. `de` selects German, anything else English.
    /// Returns the reply text in the chat's (new) language.
    pub async fn set_lang(&self, chat: &ChatRef, args: &str, user: &Sender) -> Result<String, Error> {
        if !self.gate.is_admin(chat.id, user.id).await {
            return self.texts.render(chat.id, LANG_MODULE, "unauthorized", &[]).await;
        }

        let Some(code) = args.split_whitespace().next() else {
            return self.texts.render(chat.id, LANG_MODULE, "missing", &[]).await;
        };

        let locale = Locale::from_code(code);
        self.texts.locales().set_locale(chat.id, locale).await?;
        info!("User {} set language {} in chat {}", user.id, locale, chat.id);

        Ok(self.texts.render_in(locale, LANG_MODULE, "set", &[]))
    }

    /// One line for the chat settings overview
    pub async fn chat_settings(&self, chat_id: i64) -> Result<String, Error> {
        let locale = self.texts.locale(chat_id).await?;
        Ok(self.texts.render_in(locale, LANG_MODULE, "settings", &[&locale]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::LocaleStore;
    use crate::services::flood::testing::{chat, sender, Harness, ADMIN, ALICE, CHAT};

    fn language(harness: &Harness) -> LanguageSettings {
        LanguageSettings::new(harness.gate.clone(), harness.texts())
    }

    #[tokio::test]
    async fn test_set_german_then_english() {
        let harness = Harness::new();
        let language = language(&harness);

        let reply = language.set_lang(&chat(), "de", &sender(ADMIN)).await.unwrap();
        assert_eq!(reply, "Die Sprache wurde auf Deutsch gesetzt.");
        assert_eq!(harness.store.get_locale(CHAT).await.unwrap(), Some(Locale::De));

        let reply = language.set_lang(&chat(), "klingon", &sender(ADMIN)).await.unwrap();
        assert_eq!(reply, "Set language to English.");
        assert_eq!(harness.store.get_locale(CHAT).await.unwrap(), Some(Locale::En));
    }

    #[tokio::test]
    async fn test_missing_and_unauthorized() {
        let harness = Harness::new();
        let language = language(&harness);

        let reply = language.set_lang(&chat(), "", &sender(ADMIN)).await.unwrap();
        assert!(reply.contains("/lang de"));

        let reply = language.set_lang(&chat(), "de", &sender(ALICE)).await.unwrap();
        assert_eq!(reply, "Only administrators can change the language.");
        assert_eq!(harness.store.get_locale(CHAT).await.unwrap(), None);
    }

    #[test]
    fn test_set_lang_future_is_send() {
        fn assert_send<T: Send>(_: &T) {}

        let harness = Harness::new();
        let language = language(&harness);
        let (chat, admin) = (chat(), sender(ADMIN));
        assert_send(&language.set_lang(&chat, "de", &admin));
    }

    #[tokio::test]
    async fn test_settings_line() {
        let harness = Harness::new();
        let language = language(&harness);

        assert_eq!(
            language.chat_settings(CHAT).await.unwrap(),
            "Language: `en` (change with `/lang`)"
        );
    }
}
