mod chat_locale;
mod flood_record;

pub use chat_locale::ChatLocale;
pub use flood_record::FloodRecord;
