//! The notification context shared by every channel.
//!
//! A [`NotificationContext`] is assembled once per invocation from the
//! message inputs and the workflow run metadata, and is read-only afterwards.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Server URL used when the runner does not provide one.
pub const DEFAULT_SERVER_URL: &str = "https://github.com";

/// Metadata describing the workflow run that triggered the notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub repository: String,
    pub run_id: String,
    pub run_number: String,
    pub actor: String,
    pub event_name: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub sha: String,
    pub server_url: String,
}

impl Default for RunMetadata {
    fn default() -> Self {
        Self {
            repository: String::new(),
            run_id: String::new(),
            run_number: String::new(),
            actor: String::new(),
            event_name: String::new(),
            git_ref: String::new(),
            sha: String::new(),
            server_url: DEFAULT_SERVER_URL.to_string(),
        }
    }
}

impl RunMetadata {
    /// Reads the `GITHUB_*` variables exported by the Actions runner.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds run metadata from an arbitrary variable lookup.
    ///
    /// Missing variables become empty strings, except the server URL which
    /// falls back to [`DEFAULT_SERVER_URL`].
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).unwrap_or_default();
        let server_url = lookup("GITHUB_SERVER_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

        Self {
            repository: get("GITHUB_REPOSITORY"),
            run_id: get("GITHUB_RUN_ID"),
            run_number: get("GITHUB_RUN_NUMBER"),
            actor: get("GITHUB_ACTOR"),
            event_name: get("GITHUB_EVENT_NAME"),
            git_ref: get("GITHUB_REF"),
            sha: get("GITHUB_SHA"),
            server_url,
        }
    }
}

/// Immutable bundle of the message and run metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContext {
    message: String,
    title: String,
    run: RunMetadata,
}

impl NotificationContext {
    pub fn new(message: impl Into<String>, title: impl Into<String>, run: RunMetadata) -> Self {
        Self {
            message: message.into(),
            title: title.into(),
            run,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn run(&self) -> &RunMetadata {
        &self.run
    }

    /// Link to the repository on the configured server.
    pub fn repo_url(&self) -> String {
        format!("{}/{}", self.run.server_url, self.run.repository)
    }

    /// Link to the workflow run page.
    pub fn run_url(&self) -> String {
        format!("{}/actions/runs/{}", self.repo_url(), self.run.run_id)
    }

    /// The variables available to webhook body templates.
    ///
    /// This is also the default webhook payload.
    pub fn template_vars(&self) -> Map<String, Value> {
        let run = &self.run;
        let mut vars = Map::new();
        vars.insert("message".into(), Value::from(self.message.as_str()));
        vars.insert("title".into(), Value::from(self.title.as_str()));
        vars.insert("repository".into(), Value::from(run.repository.as_str()));
        vars.insert("run_id".into(), Value::from(run.run_id.as_str()));
        vars.insert("run_number".into(), Value::from(run.run_number.as_str()));
        vars.insert("actor".into(), Value::from(run.actor.as_str()));
        vars.insert("event_name".into(), Value::from(run.event_name.as_str()));
        vars.insert("ref".into(), Value::from(run.git_ref.as_str()));
        vars.insert("sha".into(), Value::from(run.sha.as_str()));
        vars.insert("server_url".into(), Value::from(run.server_url.as_str()));
        vars.insert("run_url".into(), Value::from(self.run_url()));
        vars
    }
}
