//! Tests for the compiled binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

const SCRUBBED_VARS: &[&str] = &[
    "GITHUB_ACTIONS",
    "GITHUB_OUTPUT",
    "GITHUB_STEP_SUMMARY",
    "INPUT_MESSAGE",
    "INPUT_TITLE",
    "INPUT_SLACK-WEBHOOK",
    "INPUT_SMTP-HOST",
    "INPUT_SMTP-PORT",
    "INPUT_EMAIL-TO",
    "INPUT_WEBHOOK-URL",
    "NOTIFY_CASCADE_CORE__MESSAGE",
    "RUST_LOG",
];

fn command(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("notify-cascade").unwrap();
    cmd.current_dir(dir);
    for var in SCRUBBED_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_missing_message_fails() {
    let dir = tempdir().unwrap();
    command(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Input required and not supplied: message",
        ));
}

#[test]
fn test_message_with_no_channels_succeeds() {
    let dir = tempdir().unwrap();
    command(dir.path())
        .args(["--message", "hi"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# notify-cascade: GitHub Notification"))
        .stdout(predicate::str::contains("| Slack | ⏭️ skipped |"))
        .stdout(predicate::str::contains("| Webhook | ⏭️ skipped |"));
}

#[test]
fn test_outputs_are_written_inside_actions() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("output");
    let summary = dir.path().join("summary.md");

    command(dir.path())
        .env("GITHUB_ACTIONS", "true")
        .env("GITHUB_OUTPUT", &output)
        .env("GITHUB_STEP_SUMMARY", &summary)
        .env("INPUT_MESSAGE", "from input")
        .env("INPUT_TITLE", "Nightly")
        .assert()
        .success();

    let outputs = std::fs::read_to_string(&output).unwrap();
    assert_eq!(
        outputs,
        "slack-status=skipped\nemail-status=skipped\nwebhook-status=skipped\n"
    );
    let summary = std::fs::read_to_string(&summary).unwrap();
    assert!(summary.starts_with("# notify-cascade: Nightly\n"));
    assert!(summary.contains("from input"));
}

#[test]
fn test_missing_message_inside_actions_emits_error_command() {
    let dir = tempdir().unwrap();
    command(dir.path())
        .env("GITHUB_ACTIONS", "true")
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "::error::Input required and not supplied: message",
        ));
}

#[test]
fn test_invalid_smtp_port_fails_only_email() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("output");

    command(dir.path())
        .env("GITHUB_ACTIONS", "true")
        .env("GITHUB_OUTPUT", &output)
        .env("INPUT_MESSAGE", "hi")
        .env("INPUT_SMTP-HOST", "127.0.0.1")
        .env("INPUT_SMTP-PORT", "abc")
        .env("INPUT_EMAIL-TO", "ops@example.com")
        .assert()
        .success()
        .stdout(predicate::str::contains("::warning::"));

    let outputs = std::fs::read_to_string(&output).unwrap();
    assert!(outputs.contains("email-status=failed\n"));
    assert!(outputs.contains("slack-status=skipped\n"));
}
