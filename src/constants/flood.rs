use crate::i18n::Locale;

/// Limit value meaning flood protection is off
pub const FLOOD_DISABLED: u32 = 0;

/// Smallest limit accepted from `/setflood`; 1 or 2 would trip on the first messages
pub const MIN_FLOOD_LIMIT: u32 = 3;

/// Largest limit that fits the `antiflood.flood_limit` column
pub const MAX_FLOOD_LIMIT: u32 = i32::MAX as u32;

/// Argument words that turn flood protection off (compared lowercase)
pub const DISABLE_WORDS: &[&str] = &["off", "no", "0"];

/// Locale used for chats that never picked one
pub const DEFAULT_LOCALE: Locale = Locale::En;

/// Audit-log reason attached to flood removals
pub const KICK_REASON: &str = "Flooding";

/// String table modules
pub const ANTIFLOOD_MODULE: &str = "antiflood";
pub const LANG_MODULE: &str = "lang";
