use std::env;

use crate::constants::flood::DEFAULT_LOCALE;
use crate::i18n::Locale;

#[derive(Debug, Clone)]
pub struct Settings {
    pub discord_token: String,
    /// Postgres connection string; flood settings live in memory when unset
    pub database_url: Option<String>,
    pub guild_id: Option<u64>,
    /// Channel receiving audit lines for removals and config changes
    pub log_channel_id: Option<u64>,
    pub default_locale: Locale,
}

impl Settings {
    pub fn from_env() -> Result<Self, String> {
        let discord_token = env::var("DISCORD_TOKEN")
            .map_err(|_| "DISCORD_TOKEN environment variable not set")?;

        let database_url = env::var("DATABASE_URL").ok().filter(|s| !s.is_empty());

        let guild_id = env::var("GUILD_ID")
            .ok()
            .and_then(|s| s.parse::<u64>().ok());

        let log_channel_id = env::var("LOG_CHANNEL_ID")
            .ok()
            .and_then(|s| s.parse::<u64>().ok());

        let default_locale = env::var("DEFAULT_LOCALE")
            .ok()
            .map(|s| Locale::from_code(&s))
            .unwrap_or(DEFAULT_LOCALE);

        Ok(Self {
            discord_token,
            database_url,
            guild_id,
            log_channel_id,
            default_locale,
        })
    }
}
