//! Command-Line Interface (CLI) argument parsing.
//!
//! This module defines the command-line arguments for the application using the
//! `clap` crate. These arguments are parsed at startup and then merged over
//! the `notify-cascade.toml` file, the GitHub Actions inputs and environment
//! variables.

use clap::Parser;
use figment::{
    value::{Dict, Map, Tag, Value},
    Error, Metadata, Profile, Provider,
};
use std::path::PathBuf;

/// Sends one message to Slack, email and a generic webhook.
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// The notification message.
    #[arg(short, long, value_name = "TEXT")]
    pub message: Option<String>,

    /// The notification title.
    #[arg(short, long, value_name = "TEXT")]
    pub title: Option<String>,

    /// Slack incoming webhook URL.
    #[arg(long, value_name = "URL")]
    pub slack_webhook: Option<String>,

    /// Email recipients, comma separated.
    #[arg(long, value_name = "ADDR")]
    pub email_to: Option<String>,

    /// Generic webhook URL.
    #[arg(long, value_name = "URL")]
    pub webhook_url: Option<String>,

    /// Logging level (e.g. "debug", "warn").
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

impl Provider for Cli {
    fn metadata(&self) -> Metadata {
        Metadata::named("Command-Line Arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut dict = Dict::new();

        insert_section(
            &mut dict,
            "core",
            [
                ("message", &self.message),
                ("title", &self.title),
                ("log_level", &self.log_level),
            ],
        );
        insert_section(&mut dict, "slack", [("webhook_url", &self.slack_webhook)]);
        insert_section(&mut dict, "email", [("to", &self.email_to)]);
        insert_section(&mut dict, "webhook", [("url", &self.webhook_url)]);

        let mut map = Map::new();
        map.insert(Profile::Default, dict);
        Ok(map)
    }
}

/// Adds the flags that were given as a nested section; absent flags are left
/// out so they don't shadow lower layers.
fn insert_section<const N: usize>(
    dict: &mut Dict,
    section: &str,
    fields: [(&str, &Option<String>); N],
) {
    let values: Dict = fields
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .as_ref()
                .map(|v| (key.to_string(), Value::from(v.clone())))
        })
        .collect();

    if !values.is_empty() {
        dict.insert(section.to_string(), Value::Dict(Tag::Default, values));
    }
}
