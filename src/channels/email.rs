//! Email notification channel using SMTP.

use crate::config::{non_blank, EmailConfig};
use crate::context::NotificationContext;
use crate::core::{Channel, Outcome};
use crate::error::ChannelError;
use crate::formatting;
use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Submits a built message to a mail server.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn submit(&self, config: &EmailConfig, message: Message) -> Result<(), ChannelError>;
}

/// Submits mail over SMTP with `lettre`.
///
/// `smtp_secure` selects implicit TLS, otherwise the connection is upgraded
/// with STARTTLS. Credentials are sent when a user is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmtpMailer;

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn submit(&self, config: &EmailConfig, message: Message) -> Result<(), ChannelError> {
        let host = non_blank(&config.smtp_host).unwrap_or_default();
        let builder = if config.smtp_secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?
        };

        let mut builder = builder.port(config.port()?);
        if let Some(user) = non_blank(&config.smtp_user) {
            let password = config.smtp_password.clone().unwrap_or_default();
            builder = builder.credentials(Credentials::new(user.to_string(), password));
        }

        let mailer = builder.build();
        mailer.send(message).await?;
        Ok(())
    }
}

/// Sends the notification as a multipart (plain text and HTML) email.
pub struct EmailChannel {
    config: EmailConfig,
    transport: Arc<dyn MailTransport>,
}

impl EmailChannel {
    pub fn new(config: EmailConfig, transport: Arc<dyn MailTransport>) -> Self {
        Self { config, transport }
    }

    /// Builds the message. The sender falls back to the SMTP user and the
    /// recipient list is comma separated.
    fn build_message(&self, context: &NotificationContext) -> Result<Message, ChannelError> {
        let mut builder = Message::builder().subject(formatting::email_subject(context));

        if let Some(from) = non_blank(&self.config.from).or_else(|| non_blank(&self.config.smtp_user)) {
            builder = builder.from(parse_mailbox(from)?);
        }

        let recipients = self.config.to.as_deref().unwrap_or_default();
        for address in recipients.split(',').map(str::trim).filter(|a| !a.is_empty()) {
            builder = builder.to(parse_mailbox(address)?);
        }

        let body = MultiPart::alternative_plain_html(
            formatting::email_text(context),
            formatting::email_html(context),
        );
        Ok(builder.multipart(body)?)
    }

    async fn send(&self, context: &NotificationContext) -> Result<(), ChannelError> {
        self.config.port()?;
        let message = self.build_message(context)?;
        self.transport.submit(&self.config, message).await
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, ChannelError> {
    address.parse().map_err(|source| ChannelError::Address {
        address: address.to_string(),
        source,
    })
}

#[async_trait]
impl Channel for EmailChannel {
    fn name(&self) -> &str {
        "email"
    }

    #[instrument(skip_all, fields(channel = "email"))]
    async fn deliver(&self, context: &NotificationContext) -> Outcome {
        if self.config.is_unset() {
            debug!("SMTP host or recipient not configured, skipping.");
            return Outcome::Skipped;
        }

        match self.send(context).await {
            Ok(()) => {
                info!(to = ?self.config.to, "Sent email notification.");
                Outcome::Sent
            }
            Err(e) => {
                error!(error = %e, "Email notification failed");
                Outcome::failed(e)
            }
        }
    }
}
