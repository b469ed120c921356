//! Configuration management for notify-cascade
//!
//! This module defines the main `Config` struct and its per-channel sections.
//! It uses the `figment` crate to layer built-in defaults, a
//! `notify-cascade.toml` file, GitHub Actions inputs, environment variables
//! and command-line flags, in that order of increasing priority.

use crate::cli::Cli;
use crate::error::{ChannelError, ConfigError};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    value::{Dict, Map, Tag, Value},
    Figment, Metadata, Profile, Provider,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "notify-cascade.toml";

/// Title used when none is supplied.
pub const DEFAULT_TITLE: &str = "GitHub Notification";

/// SMTP port used when none is supplied.
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// The main configuration struct for the application.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    /// Message, title and logging settings.
    #[serde(default)]
    pub core: CoreConfig,
    /// Settings for the fan-out itself.
    #[serde(default)]
    pub dispatch: DispatchConfig,
    /// Configuration for the Slack channel.
    #[serde(default)]
    pub slack: SlackConfig,
    /// Configuration for the email channel.
    #[serde(default)]
    pub email: EmailConfig,
    /// Configuration for the generic webhook channel.
    #[serde(default)]
    pub webhook: WebhookConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CoreConfig {
    /// The notification body. Required.
    #[serde(default)]
    pub message: Option<String>,
    /// The notification title.
    #[serde(default = "default_title")]
    pub title: String,
    /// The logging level for the application.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            message: None,
            title: default_title(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DispatchConfig {
    /// Deadline for each channel in seconds. `0` disables it.
    #[serde(default = "default_channel_timeout")]
    pub channel_timeout_seconds: u64,
}

fn default_channel_timeout() -> u64 {
    30
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            channel_timeout_seconds: default_channel_timeout(),
        }
    }
}

impl DispatchConfig {
    pub fn channel_timeout(&self) -> Option<Duration> {
        (self.channel_timeout_seconds > 0).then(|| Duration::from_secs(self.channel_timeout_seconds))
    }
}

/// Configuration for Slack notifications.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct SlackConfig {
    /// The Slack incoming webhook URL.
    #[serde(default)]
    pub webhook_url: Option<String>,
    /// Channel override, e.g. `#deploys`.
    #[serde(default)]
    pub channel: Option<String>,
    /// Username override.
    #[serde(default)]
    pub username: Option<String>,
    /// Icon emoji override, e.g. `:rocket:`.
    #[serde(default)]
    pub icon_emoji: Option<String>,
}

impl SlackConfig {
    /// The channel is unset when no webhook URL is configured.
    pub fn is_unset(&self) -> bool {
        is_blank(&self.webhook_url)
    }
}

/// Configuration for email notifications.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct EmailConfig {
    #[serde(default)]
    pub smtp_host: Option<String>,
    /// Kept as text; it is parsed at delivery so a bad value only fails
    /// the email channel.
    #[serde(default, deserialize_with = "lenient_port")]
    pub smtp_port: Option<String>,
    /// Use implicit TLS instead of STARTTLS.
    #[serde(default, deserialize_with = "lenient_flag")]
    pub smtp_secure: bool,
    #[serde(default)]
    pub smtp_user: Option<String>,
    #[serde(default)]
    pub smtp_password: Option<String>,
    /// Sender address. Falls back to `smtp_user`.
    #[serde(default)]
    pub from: Option<String>,
    /// Recipients, comma separated.
    #[serde(default)]
    pub to: Option<String>,
}

impl EmailConfig {
    /// The channel is unset when either the SMTP host or the recipient is missing.
    pub fn is_unset(&self) -> bool {
        is_blank(&self.smtp_host) || is_blank(&self.to)
    }

    /// The SMTP port, [`DEFAULT_SMTP_PORT`] when unset.
    pub fn port(&self) -> Result<u16, ChannelError> {
        match non_blank(&self.smtp_port) {
            None => Ok(DEFAULT_SMTP_PORT),
            Some(text) => text
                .parse()
                .map_err(|_| ChannelError::InvalidPort(text.to_string())),
        }
    }
}

/// Configuration for the generic webhook.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct WebhookConfig {
    #[serde(default)]
    pub url: Option<String>,
    /// HTTP method, `POST` when absent.
    #[serde(default)]
    pub method: Option<String>,
    /// Extra headers as a JSON object.
    #[serde(default)]
    pub headers: Option<String>,
    /// Body template with `{{placeholder}}` substitution.
    #[serde(default)]
    pub body_template: Option<String>,
}

impl WebhookConfig {
    /// The channel is unset when no URL is configured.
    pub fn is_unset(&self) -> bool {
        is_blank(&self.url)
    }
}

fn is_blank(value: &Option<String>) -> bool {
    non_blank(value).is_none()
}

/// Returns the trimmed value when it is present and not blank.
pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(i64),
    Text(String),
}

/// Accepts a port as a number or as text and keeps it as text.
fn lenient_port<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<NumberOrText>::deserialize(deserializer)? {
        Some(NumberOrText::Number(n)) => Some(n.to_string()),
        Some(NumberOrText::Text(text)) => Some(text),
        None => None,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagOrText {
    Flag(bool),
    Text(String),
}

/// Accepts a boolean or the text `true`; any other text is `false`.
fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<FlagOrText>::deserialize(deserializer)? {
        Some(FlagOrText::Flag(flag)) => flag,
        Some(FlagOrText::Text(text)) => text.trim().eq_ignore_ascii_case("true"),
        None => false,
    })
}

impl Config {
    /// Loads the configuration for an invocation described by `cli`.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        Ok(Self::figment(cli, ActionInputs::from_env()).extract()?)
    }

    /// Builds the layered figment without extracting it.
    pub fn figment(cli: &Cli, inputs: ActionInputs) -> Figment {
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(inputs)
            // e.g. NOTIFY_CASCADE_WEBHOOK__URL=https://...
            .merge(Env::prefixed("NOTIFY_CASCADE_").split("__"))
            .merge(cli.clone())
    }

    /// Returns the required message, or the error that aborts the invocation.
    pub fn message(&self) -> Result<&str, ConfigError> {
        self.core
            .message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .ok_or(ConfigError::MissingInput("message"))
    }
}

/// GitHub Actions input names and the config keys they populate.
const ACTION_INPUTS: &[(&str, &str, &str)] = &[
    ("MESSAGE", "core", "message"),
    ("TITLE", "core", "title"),
    ("SLACK-WEBHOOK", "slack", "webhook_url"),
    ("SLACK-CHANNEL", "slack", "channel"),
    ("SLACK-USERNAME", "slack", "username"),
    ("SLACK-ICON-EMOJI", "slack", "icon_emoji"),
    ("SMTP-HOST", "email", "smtp_host"),
    ("SMTP-PORT", "email", "smtp_port"),
    ("SMTP-SECURE", "email", "smtp_secure"),
    ("SMTP-USER", "email", "smtp_user"),
    ("SMTP-PASSWORD", "email", "smtp_password"),
    ("EMAIL-FROM", "email", "from"),
    ("EMAIL-TO", "email", "to"),
    ("WEBHOOK-URL", "webhook", "url"),
    ("WEBHOOK-METHOD", "webhook", "method"),
    ("WEBHOOK-HEADERS", "webhook", "headers"),
    ("WEBHOOK-BODY-TEMPLATE", "webhook", "body_template"),
];

/// A figment provider for the `INPUT_*` variables the Actions runner sets.
///
/// The runner exports every declared input, blank or not, so blank values
/// are dropped here and never shadow lower layers. Values stay text.
#[derive(Debug, Clone, Default)]
pub struct ActionInputs {
    values: BTreeMap<String, String>,
}

impl ActionInputs {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let values = ACTION_INPUTS
            .iter()
            .filter_map(|(input, _, _)| {
                let value = lookup(&format!("INPUT_{}", input))?;
                (!value.trim().is_empty()).then(|| (input.to_string(), value))
            })
            .collect();
        Self { values }
    }
}

impl Provider for ActionInputs {
    fn metadata(&self) -> Metadata {
        Metadata::named("GitHub Actions inputs")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        let mut sections: BTreeMap<&str, Dict> = BTreeMap::new();
        for (input, section, key) in ACTION_INPUTS {
            if let Some(value) = self.values.get(*input) {
                sections
                    .entry(*section)
                    .or_default()
                    .insert(key.to_string(), Value::from(value.clone()));
            }
        }

        let dict = sections
            .into_iter()
            .map(|(section, values)| (section.to_string(), Value::Dict(Tag::Default, values)))
            .collect();

        let mut map = Map::new();
        map.insert(Profile::Default, dict);
        Ok(map)
    }
}
