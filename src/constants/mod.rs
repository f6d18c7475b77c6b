pub mod embeds;
pub mod flood;
