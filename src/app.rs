//! The main application logic, decoupled from the entry point.

use crate::{
    channels::{self, MailTransport, SmtpMailer},
    config::Config,
    context::{NotificationContext, RunMetadata},
    core::Channel,
    dispatcher::{dispatch, DispatchOptions},
    error::ConfigError,
    publish::Publisher,
    report::{aggregate, SummaryReport},
};
use std::sync::Arc;
use tracing::{error, info, warn};

/// One notification invocation, ready to run.
pub struct App {
    context: Arc<NotificationContext>,
    channels: Vec<Arc<dyn Channel>>,
    options: DispatchOptions,
}

impl App {
    /// Creates a new `AppBuilder` to construct an `App`.
    pub fn builder(config: Config) -> AppBuilder {
        AppBuilder::new(config)
    }

    pub fn context(&self) -> &NotificationContext {
        &self.context
    }

    /// Dispatches to every channel and publishes the results.
    ///
    /// Channel failures never make this fail; they are reported through the
    /// status outputs and a warning. Publishing errors are logged.
    pub async fn run(&self, publisher: &dyn Publisher) -> SummaryReport {
        info!("Starting notifications for: \"{}\"", self.context.title());

        let results = dispatch(&self.channels, Arc::clone(&self.context), self.options).await;
        let report = aggregate(&results);

        for (name, status) in report.status_outputs() {
            if let Err(e) = publisher.set_output(&name, status) {
                error!(output = %name, "Failed to publish output: {:#}", e);
            }
        }

        let summary = report.to_markdown(self.context.title(), self.context.message());
        if let Err(e) = publisher.write_summary(&summary) {
            error!("Failed to write run summary: {:#}", e);
        }

        if let Some(warning) = report.warning() {
            for row in report.rows() {
                if let Some(reason) = row.outcome.error() {
                    warn!(channel = %row.channel, "Channel failed: {}", reason);
                }
            }
            publisher.warning(warning);
        }

        info!("Done. {}", report.digest());
        report
    }
}

/// Builder for the main application.
///
/// Validates the required input and assembles the context and channels. The
/// channel set, mail transport and run metadata can be overridden for
/// testing.
pub struct AppBuilder {
    config: Config,
    channels_override: Option<Vec<Arc<dyn Channel>>>,
    mail_transport_override: Option<Arc<dyn MailTransport>>,
    http_client_override: Option<reqwest::Client>,
    run_metadata_override: Option<RunMetadata>,
}

impl AppBuilder {
    /// Creates a new `AppBuilder` with the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            channels_override: None,
            mail_transport_override: None,
            http_client_override: None,
            run_metadata_override: None,
        }
    }

    /// Replaces the configured channels.
    pub fn channels_override(mut self, channels: Vec<Arc<dyn Channel>>) -> Self {
        self.channels_override = Some(channels);
        self
    }

    /// Replaces the SMTP transport used by the email channel.
    pub fn mail_transport_override(mut self, transport: Arc<dyn MailTransport>) -> Self {
        self.mail_transport_override = Some(transport);
        self
    }

    /// Replaces the HTTP client used by the Slack and webhook channels.
    pub fn http_client_override(mut self, client: reqwest::Client) -> Self {
        self.http_client_override = Some(client);
        self
    }

    /// Uses the given run metadata instead of reading the environment.
    pub fn run_metadata(mut self, run: RunMetadata) -> Self {
        self.run_metadata_override = Some(run);
        self
    }

    /// Builds the application. Fails when the message is missing or the HTTP
    /// client cannot be created.
    pub fn build(self) -> Result<App, ConfigError> {
        let message = self.config.message()?;
        let run = self.run_metadata_override.unwrap_or_else(RunMetadata::from_env);
        let context = Arc::new(NotificationContext::new(
            message,
            self.config.core.title.as_str(),
            run,
        ));

        let channels = match self.channels_override {
            Some(channels) => channels,
            None => {
                let client = match self.http_client_override {
                    Some(client) => client,
                    None => channels::http_client().map_err(ConfigError::HttpClient)?,
                };
                let transport = self
                    .mail_transport_override
                    .unwrap_or_else(|| Arc::new(SmtpMailer) as Arc<dyn MailTransport>);
                channels::from_config(&self.config, client, transport)
            }
        };

        Ok(App {
            context,
            channels,
            options: DispatchOptions {
                channel_timeout: self.config.dispatch.channel_timeout(),
            },
        })
    }
}
