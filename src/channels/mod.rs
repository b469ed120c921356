//! Delivery channels.
//!
//! Each channel owns its configuration and implements [`Channel`]. The set
//! is fixed: Slack, email and a generic webhook, dispatched in that order.

pub mod email;
pub mod slack;
pub mod webhook;

pub use email::{EmailChannel, MailTransport, SmtpMailer};
pub use slack::SlackChannel;
pub use webhook::WebhookChannel;

use crate::config::Config;
use crate::core::Channel;
use crate::error::ChannelError;
use reqwest::StatusCode;
use std::sync::Arc;

/// User agent sent with every HTTP delivery.
pub const USER_AGENT: &str = "notify-cascade-action";

/// Builds the shared HTTP client.
///
/// Redirects are not followed: a 3xx reply is a failed delivery.
pub fn http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::none())
        .build()
}

/// Builds the three channels from their configuration sections.
pub fn from_config(
    config: &Config,
    client: reqwest::Client,
    mail_transport: Arc<dyn MailTransport>,
) -> Vec<Arc<dyn Channel>> {
    vec![
        Arc::new(SlackChannel::new(config.slack.clone(), client.clone())),
        Arc::new(EmailChannel::new(config.email.clone(), mail_transport)),
        Arc::new(WebhookChannel::new(config.webhook.clone(), client)),
    ]
}

/// Maps an HTTP response status onto the delivery result.
pub(crate) fn check_status(status: StatusCode) -> Result<(), ChannelError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(ChannelError::Status(status.as_u16()))
    }
}
