pub mod memory;
pub mod models;
pub mod pool;
pub mod postgres;
pub mod queries;
pub mod store;

pub use store::Stores;
