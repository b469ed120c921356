//! Error types for configuration loading and channel delivery.

use thiserror::Error;

/// Errors that abort an invocation before any channel runs.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Input required and not supplied: {0}")]
    MissingInput(&'static str),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Load(Box::new(err))
    }
}

/// Errors raised while delivering through a single channel.
///
/// These never leave the channel adapter; they are folded into
/// [`Outcome::Failed`](crate::core::Outcome::Failed) with their display text.
#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("HTTP {0}")]
    Status(u16),

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid SMTP port '{0}'")]
    InvalidPort(String),

    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),

    #[error("invalid email address '{address}': {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("failed to build email: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("{0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}
