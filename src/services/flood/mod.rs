//! Flood detection: counts consecutive messages per chat and removes
//! members who reach the chat's limit.

pub mod detector;
pub mod executor;
pub mod ports;
pub mod settings;
pub mod worker;

#[cfg(test)]
pub(crate) mod testing;

mod service;

pub use detector::{FloodDetector, FloodVerdict};
pub use executor::ActionExecutor;
pub use ports::{AdminGate, ChatRef, MessageEvent, MessageRef, ModerationTransport, RemovalOutcome, Sender};
pub use service::AntiFlood;
pub use settings::{FloodArgument, FloodConfig, SetFloodOutcome, SetFloodResponse};
pub use worker::{FloodWorker, WorkerEvent};
