pub mod antiflood;
pub mod locale;
