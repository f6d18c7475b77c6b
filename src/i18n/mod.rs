//! Localized user-facing text.
//!
//! Templates use positional `{}` placeholders and are looked up by module,
//! key and locale. The bundled tables ship English and German.

use std::collections::HashMap;
use std::fmt::{self, Display};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::Deserialize;
use tracing::warn;

use crate::bot::error::Error;
use crate::db::store::LocaleStore;
use crate::utils::formatting::fill;

/// Chat language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    De,
}

impl Locale {
    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::De => "de",
        }
    }

    /// Anything other than `de` selects English
    pub fn from_code(code: &str) -> Self {
        if code.trim().eq_ignore_ascii_case("de") {
            Locale::De
        } else {
            Locale::En
        }
    }
}

impl Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Template lookup
pub trait Strings: Send + Sync {
    fn get_string(&self, module: &str, key: &str, locale: Locale) -> String;
}

type StringTable = HashMap<String, HashMap<Locale, HashMap<String, String>>>;

/// String tables compiled into the binary
#[derive(Debug)]
pub struct BundledStrings {
    tables: StringTable,
}

impl BundledStrings {
    pub fn from_json(raw: &str) -> Result<Self, Error> {
        let tables: StringTable = serde_json::from_str(raw)?;
        Ok(Self { tables })
    }

    /// Parsed once per process
    pub fn bundled() -> Result<&'static BundledStrings, Error> {
        static BUNDLE: OnceCell<BundledStrings> = OnceCell::new();
        BUNDLE.get_or_try_init(|| Self::from_json(include_str!("strings.json")))
    }

    fn lookup(&self, module: &str, key: &str, locale: Locale) -> Option<&str> {
        self.tables
            .get(module)?
            .get(&locale)?
            .get(key)
            .map(String::as_str)
    }
}

impl Strings for BundledStrings {
    fn get_string(&self, module: &str, key: &str, locale: Locale) -> String {
        if let Some(template) = self.lookup(module, key, locale) {
            return template.to_string();
        }

        if let Some(template) = self.lookup(module, key, Locale::En) {
            return template.to_string();
        }

        warn!("Missing string {}.{} for locale {}", module, key, locale);
        key.to_string()
    }
}

impl Strings for &'static BundledStrings {
    fn get_string(&self, module: &str, key: &str, locale: Locale) -> String {
        (**self).get_string(module, key, locale)
    }
}

/// Resolves each chat's language before looking templates up
#[derive(Clone)]
pub struct ChatTexts {
    strings: Arc<dyn Strings>,
    locales: Arc<dyn LocaleStore>,
    default_locale: Locale,
}

impl ChatTexts {
    pub fn new(
        strings: Arc<dyn Strings>,
        locales: Arc<dyn LocaleStore>,
        default_locale: Locale,
    ) -> Self {
        Self {
            strings,
            locales,
            default_locale,
        }
    }

    pub async fn locale(&self, chat_id: i64) -> Result<Locale, Error> {
        Ok(self
            .locales
            .get_locale(chat_id)
            .await?
            .unwrap_or(self.default_locale))
    }

    /// Render `module.key` for the chat, filling `{}` placeholders in order
    pub async fn render(
        &self,
        chat_id: i64,
        module: &str,
        key: &str,
        args: &[&(dyn Display + Sync)],
    ) -> Result<String, Error> {
        let locale = self.locale(chat_id).await?;
        Ok(self.render_in(locale, module, key, args))
    }

    pub fn render_in(
        &self,
        locale: Locale,
        module: &str,
        key: &str,
        args: &[&(dyn Display + Sync)],
    ) -> String {
        fill(&self.strings.get_string(module, key, locale), args)
    }

    pub fn locales(&self) -> &Arc<dyn LocaleStore> {
        &self.locales
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;

    #[test]
    fn test_bundled_tables_cover_both_locales() {
        let bundle = BundledStrings::bundled().unwrap();

        for (module, locales) in &bundle.tables {
            let english = &locales[&Locale::En];
            let german = locales
                .get(&Locale::De)
                .unwrap_or_else(|| panic!("{} has no German table", module));

            for key in english.keys() {
                assert!(german.contains_key(key), "{}.{} missing in de", module, key);
            }
        }
    }

    #[test]
    fn test_falls_back_to_english_then_key() {
        let bundle = BundledStrings::from_json(
            r#"{"antiflood": {"en": {"only_en": "hello"}, "de": {}}}"#,
        )
        .unwrap();

        assert_eq!(bundle.get_string("antiflood", "only_en", Locale::De), "hello");
        assert_eq!(bundle.get_string("antiflood", "nope", Locale::De), "nope");
        assert_eq!(bundle.get_string("other", "nope", Locale::En), "nope");
    }

    #[test]
    fn test_locale_codes() {
        assert_eq!(Locale::from_code("de"), Locale::De);
        assert_eq!(Locale::from_code(" DE "), Locale::De);
        assert_eq!(Locale::from_code("en"), Locale::En);
        assert_eq!(Locale::from_code("fr"), Locale::En);
        assert_eq!(Locale::De.to_string(), "de");
    }

    #[tokio::test]
    async fn test_chat_texts_use_chat_locale() {
        let store = Arc::new(MemoryStore::new());
        let texts = ChatTexts::new(
            Arc::new(BundledStrings::bundled().unwrap()),
            store.clone(),
            Locale::En,
        );

        store.set_locale(7, Locale::De).await.unwrap();

        let german = texts.render(7, "antiflood", "info", &[&5]).await.unwrap();
        let english = texts.render(8, "antiflood", "info", &[&5]).await.unwrap();

        assert!(german.starts_with("Der Flood-Schutz ist aktiv: 5"));
        assert!(english.starts_with("Flood protection is active: 5"));
    }
}
