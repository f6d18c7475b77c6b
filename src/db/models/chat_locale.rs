use chrono::{DateTime, Utc};

use crate::i18n::Locale;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChatLocale {
    pub chat_id: i64,
    pub locale: String,
    pub updated_at: DateTime<Utc>,
}

impl ChatLocale {
    pub fn locale(&self) -> Locale {
        Locale::from_code(&self.locale)
    }
}
