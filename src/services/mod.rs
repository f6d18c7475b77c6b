pub mod flood;
pub mod language;
pub mod moderation;
