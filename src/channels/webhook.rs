//! Generic webhook notification channel.

use super::{check_status, USER_AGENT};
use crate::config::{non_blank, WebhookConfig};
use crate::context::NotificationContext;
use crate::core::{Channel, Outcome};
use crate::error::ChannelError;
use crate::template::{self, HeaderSet};
use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use tracing::{debug, error, info, instrument, warn};

/// Sends the notification to an arbitrary HTTP endpoint.
///
/// The body is the rendered template when one is configured, otherwise the
/// full context as JSON.
pub struct WebhookChannel {
    config: WebhookConfig,
    client: reqwest::Client,
}

impl WebhookChannel {
    pub fn new(config: WebhookConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn method(&self) -> Result<Method, ChannelError> {
        let name = non_blank(&self.config.method)
            .unwrap_or("POST")
            .to_uppercase();
        Method::from_bytes(name.as_bytes()).map_err(|_| ChannelError::InvalidMethod(name))
    }

    async fn send(&self, url: &str, context: &NotificationContext) -> Result<(), ChannelError> {
        let method = self.method()?;
        let headers = build_headers(template::parse_headers(self.config.headers.as_deref()));
        let body = template::render(self.config.body_template.as_deref(), &context.template_vars());

        let mut request = self.client.request(method.clone(), url).headers(headers);
        if method != Method::GET {
            let wire = body.to_wire();
            if !wire.is_empty() {
                request = request
                    .header(header::CONTENT_LENGTH, wire.len())
                    .body(wire);
            }
        }

        debug!(%method, "Sending webhook request.");
        let response = request.send().await?;
        check_status(response.status())
    }
}

/// Default headers with the user-supplied ones merged over them.
///
/// Header names or values that are not valid HTTP are skipped.
fn build_headers(extra: HeaderSet) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));

    for (name, value) in extra {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => warn!(header = %name, "Ignoring invalid webhook header"),
        }
    }

    headers
}

#[async_trait]
impl Channel for WebhookChannel {
    fn name(&self) -> &str {
        "webhook"
    }

    #[instrument(skip_all, fields(channel = "webhook"))]
    async fn deliver(&self, context: &NotificationContext) -> Outcome {
        let Some(url) = non_blank(&self.config.url) else {
            debug!("No webhook URL configured, skipping.");
            return Outcome::Skipped;
        };

        match self.send(url, context).await {
            Ok(()) => {
                info!("Sent webhook notification.");
                Outcome::Sent
            }
            Err(e) => {
                error!(error = %e, "Webhook notification failed");
                Outcome::failed(e)
            }
        }
    }
}
