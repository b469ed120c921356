//! A client for sending notifications to Slack.

use super::check_status;
use crate::config::{non_blank, SlackConfig};
use crate::context::NotificationContext;
use crate::core::{Channel, Outcome};
use crate::error::ChannelError;
use crate::formatting;
use async_trait::async_trait;
use tracing::{debug, error, info, instrument};

/// Posts the notification to a Slack incoming webhook.
pub struct SlackChannel {
    config: SlackConfig,
    client: reqwest::Client,
}

impl SlackChannel {
    /// Creates a new `SlackChannel`.
    pub fn new(config: SlackConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    async fn post(&self, webhook_url: &str, context: &NotificationContext) -> Result<(), ChannelError> {
        let payload = formatting::slack_payload(context, &self.config);
        let response = self.client.post(webhook_url).json(&payload).send().await?;
        check_status(response.status())
    }
}

#[async_trait]
impl Channel for SlackChannel {
    fn name(&self) -> &str {
        "slack"
    }

    #[instrument(skip_all, fields(channel = "slack"))]
    async fn deliver(&self, context: &NotificationContext) -> Outcome {
        let Some(webhook_url) = non_blank(&self.config.webhook_url) else {
            debug!("No Slack webhook configured, skipping.");
            return Outcome::Skipped;
        };

        match self.post(webhook_url, context).await {
            Ok(()) => {
                info!("Sent Slack notification.");
                Outcome::Sent
            }
            Err(e) => {
                error!(error = %e, "Slack notification failed");
                Outcome::failed(e)
            }
        }
    }
}
