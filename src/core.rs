//! Core domain types and service traits for notify-cascade
//!
//! This module defines the outcome model and the trait contract every
//! delivery channel implements.

use crate::context::NotificationContext;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The result of attempting delivery on one channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    /// The transport accepted the notification.
    Sent,
    /// The channel is not configured; nothing was attempted.
    Skipped,
    /// Delivery was attempted and did not succeed.
    Failed { error: String },
}

impl Outcome {
    /// Builds a failed outcome from any displayable error.
    pub fn failed(error: impl fmt::Display) -> Self {
        Outcome::Failed {
            error: error.to_string(),
        }
    }

    /// The wire token published for this outcome.
    pub fn status(&self) -> &'static str {
        match self {
            Outcome::Sent => "sent",
            Outcome::Skipped => "skipped",
            Outcome::Failed { .. } => "failed",
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }

    /// The diagnostic message of a failed outcome.
    pub fn error(&self) -> Option<&str> {
        match self {
            Outcome::Failed { error } => Some(error),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.status())
    }
}

/// A notification delivery channel.
#[async_trait]
pub trait Channel: Send + Sync {
    /// A short, stable name for the channel (e.g., "slack", "webhook").
    /// Used for logging and for the published status keys.
    fn name(&self) -> &str;

    /// Delivers the notification described by `context`.
    ///
    /// Implementations check their configuration first and return
    /// [`Outcome::Skipped`] without any I/O when it is unset. Transport
    /// errors are reported as [`Outcome::Failed`], never returned or raised.
    async fn deliver(&self, context: &NotificationContext) -> Outcome;
}

/// The outcome of one channel, tagged with the channel's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchResult {
    pub channel: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}
