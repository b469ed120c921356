//! Tests for configuration layering across file, environment and flags.

use clap::Parser;
use notify_cascade::cli::Cli;
use notify_cascade::config::{ActionInputs, Config, DEFAULT_SMTP_PORT, DEFAULT_TITLE};
use serial_test::serial;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

const SAMPLE_TOML: &str = r##"
[core]
message = "from file"
title = "File title"

[dispatch]
channel_timeout_seconds = 5

[slack]
webhook_url = "https://hooks.slack.test/file"
channel = "#deploys"

[email]
smtp_host = "smtp.example.com"
smtp_port = "2525"
smtp_secure = "true"
to = "ops@example.com"

[webhook]
url = "https://example.com/hook"
method = "put"
"##;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn cli_for(file: &NamedTempFile, extra: &[&str]) -> Cli {
    let path = file.path().to_str().unwrap();
    let mut args = vec!["notify-cascade", "--config", path];
    args.extend_from_slice(extra);
    Cli::try_parse_from(args).unwrap()
}

fn load(cli: &Cli, inputs: ActionInputs) -> Result<Config, figment::Error> {
    Config::figment(cli, inputs).extract()
}

#[test]
#[serial]
fn test_file_values_are_loaded() {
    let file = write_config(SAMPLE_TOML);
    let config = load(&cli_for(&file, &[]), ActionInputs::default()).unwrap();

    assert_eq!(config.message().unwrap(), "from file");
    assert_eq!(config.core.title, "File title");
    assert_eq!(config.dispatch.channel_timeout(), Some(Duration::from_secs(5)));
    assert_eq!(config.slack.channel.as_deref(), Some("#deploys"));
    assert_eq!(config.email.port().unwrap(), 2525);
    assert!(config.email.smtp_secure);
    assert_eq!(config.webhook.method.as_deref(), Some("put"));
}

#[test]
#[serial]
fn test_missing_file_falls_back_to_defaults() {
    let cli = Cli::try_parse_from(["notify-cascade", "--config", "/nonexistent/notify.toml"]).unwrap();
    let config = load(&cli, ActionInputs::default()).unwrap();

    assert!(config.core.message.is_none());
    assert_eq!(config.core.title, DEFAULT_TITLE);
    assert_eq!(config.email.port().unwrap(), DEFAULT_SMTP_PORT);
    assert!(config.slack.is_unset());
}

#[test]
#[serial]
fn test_action_inputs_override_file() {
    let file = write_config(SAMPLE_TOML);
    let inputs = ActionInputs::from_lookup(|key| match key {
        "INPUT_TITLE" => Some("Input title".to_string()),
        "INPUT_SLACK-WEBHOOK" => Some("".to_string()),
        _ => None,
    });

    let config = load(&cli_for(&file, &[]), inputs).unwrap();

    assert_eq!(config.core.title, "Input title");
    // Blank inputs never shadow lower layers.
    assert_eq!(
        config.slack.webhook_url.as_deref(),
        Some("https://hooks.slack.test/file")
    );
}

#[test]
#[serial]
fn test_env_overrides_file() {
    let file = write_config(SAMPLE_TOML);
    std::env::set_var("NOTIFY_CASCADE_WEBHOOK__URL", "https://env.example.com/hook");
    std::env::set_var("NOTIFY_CASCADE_EMAIL__SMTP_PORT", "465");

    let result = load(&cli_for(&file, &[]), ActionInputs::default());

    std::env::remove_var("NOTIFY_CASCADE_WEBHOOK__URL");
    std::env::remove_var("NOTIFY_CASCADE_EMAIL__SMTP_PORT");

    let config = result.unwrap();
    assert_eq!(config.webhook.url.as_deref(), Some("https://env.example.com/hook"));
    assert_eq!(config.email.port().unwrap(), 465);
}

#[test]
#[serial]
fn test_cli_flags_take_precedence() {
    let file = write_config(SAMPLE_TOML);
    std::env::set_var("NOTIFY_CASCADE_CORE__MESSAGE", "from env");

    let cli = cli_for(
        &file,
        &["--message", "from flag", "--slack-webhook", "https://hooks.slack.test/flag"],
    );
    let result = load(&cli, ActionInputs::default());

    std::env::remove_var("NOTIFY_CASCADE_CORE__MESSAGE");

    let config = result.unwrap();
    assert_eq!(config.message().unwrap(), "from flag");
    assert_eq!(
        config.slack.webhook_url.as_deref(),
        Some("https://hooks.slack.test/flag")
    );
    // Untouched keys still come from the file.
    assert_eq!(config.core.title, "File title");
}

#[test]
#[serial]
fn test_invalid_port_does_not_abort_loading() {
    let file = write_config("[core]\nmessage = \"hi\"\n[email]\nsmtp_port = \"not-a-port\"\n");
    let config = load(&cli_for(&file, &[]), ActionInputs::default()).unwrap();

    assert_eq!(config.message().unwrap(), "hi");
    let err = config.email.port().unwrap_err();
    assert_eq!(err.to_string(), "invalid SMTP port 'not-a-port'");
}

#[test]
#[serial]
fn test_wrong_type_is_an_error() {
    let file = write_config("[dispatch]\nchannel_timeout_seconds = \"soon\"\n");
    assert!(load(&cli_for(&file, &[]), ActionInputs::default()).is_err());
}
