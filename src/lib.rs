/// notify-cascade - fan-out notification dispatcher
///
/// This library delivers one message to Slack, email and a generic webhook
/// concurrently, isolates each channel's failure, and reports a status per
/// channel.
pub mod app;
pub mod channels;
pub mod cli;
pub mod config;
pub mod context;
pub mod core;
pub mod dispatcher;
pub mod error;
pub mod formatting;
pub mod publish;
pub mod report;
pub mod template;

// Re-export core types for convenience
pub use crate::core::*;
