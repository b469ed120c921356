// src/formatting.rs

use crate::config::{non_blank, SlackConfig};
use crate::context::NotificationContext;
use serde_json::{json, Map, Value};

/// Builds the Slack incoming-webhook payload for a notification.
///
/// The payload carries a plain `text` fallback and Block Kit blocks: a
/// header with the title, the message as mrkdwn, and a context line linking
/// the repository and the run.
pub fn slack_payload(context: &NotificationContext, config: &SlackConfig) -> Value {
    let mut payload = Map::new();
    payload.insert(
        "text".into(),
        Value::from(format!("*{}*\n{}", context.title(), context.message())),
    );
    payload.insert("blocks".into(), slack_blocks(context));

    let optional = [
        ("channel", &config.channel),
        ("username", &config.username),
        ("icon_emoji", &config.icon_emoji),
    ];
    for (key, value) in optional {
        if let Some(value) = non_blank(value) {
            payload.insert(key.into(), Value::from(value));
        }
    }

    Value::Object(payload)
}

fn slack_blocks(context: &NotificationContext) -> Value {
    let run = context.run();
    let mut blocks = vec![
        json!({
            "type": "header",
            "text": { "type": "plain_text", "text": context.title() }
        }),
        json!({
            "type": "section",
            "text": { "type": "mrkdwn", "text": context.message() }
        }),
    ];

    if !run.repository.is_empty() {
        let footer = format!(
            "<{}|{}> • <{}|Run #{}>",
            context.repo_url(),
            run.repository,
            context.run_url(),
            run.run_number
        );
        blocks.push(json!({
            "type": "context",
            "elements": [{ "type": "mrkdwn", "text": footer }]
        }));
    }

    Value::Array(blocks)
}

/// Subject line for the notification email.
pub fn email_subject(context: &NotificationContext) -> String {
    format!("[GitHub] {}", context.title())
}

/// Plain-text alternative of the notification email.
pub fn email_text(context: &NotificationContext) -> String {
    format!(
        "{}\n\n{}\n\nRepo: {}\nRun: {}",
        context.title(),
        context.message(),
        context.repo_url(),
        context.run_url()
    )
}

/// HTML alternative of the notification email.
pub fn email_html(context: &NotificationContext) -> String {
    let run = context.run();
    let repo_url = escape_html(&context.repo_url());
    let run_url = escape_html(&context.run_url());
    let run_number = escape_html(&run.run_number);

    format!(
        r#"<!DOCTYPE html>
<html>
<body style="font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; max-width: 600px; margin: 0 auto; padding: 24px; color: #24292e;">
  <div style="border-left: 4px solid #0366d6; padding-left: 16px; margin-bottom: 24px;">
    <h2 style="margin: 0 0 8px; color: #0366d6;">{title}</h2>
    <p style="margin: 0; color: #586069;">{repository} &bull; Run #{run_number}</p>
  </div>
  <div style="background: #f6f8fa; padding: 16px; border-radius: 6px; margin-bottom: 24px;">
    <p style="margin: 0; white-space: pre-wrap;">{message}</p>
  </div>
  <div style="font-size: 12px; color: #586069;">
    <a href="{repo_url}" style="color: #0366d6;">View Repository</a>
    &nbsp;&bull;&nbsp;
    <a href="{run_url}" style="color: #0366d6;">View Run #{run_number}</a>
  </div>
</body>
</html>"#,
        title = escape_html(context.title()),
        repository = escape_html(&run.repository),
        message = escape_html(context.message()),
    )
}

/// Escapes the characters that are significant in HTML text and attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
