#![allow(dead_code)]
//! Shared fakes for the integration tests.

use anyhow::Result;
use async_trait::async_trait;
use notify_cascade::context::{NotificationContext, RunMetadata};
use notify_cascade::core::{Channel, Outcome};
use notify_cascade::publish::Publisher;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// A publisher that records everything it is asked to publish.
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    pub outputs: Mutex<Vec<(String, String)>>,
    pub summaries: Mutex<Vec<String>>,
    pub warnings: Mutex<Vec<String>>,
    pub failures: Mutex<Vec<String>>,
}

impl RecordingPublisher {
    pub fn output(&self, name: &str) -> Option<String> {
        self.outputs
            .lock()
            .unwrap()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().unwrap().clone()
    }

    pub fn summary(&self) -> String {
        self.summaries.lock().unwrap().concat()
    }
}

impl Publisher for RecordingPublisher {
    fn set_output(&self, name: &str, value: &str) -> Result<()> {
        self.outputs
            .lock()
            .unwrap()
            .push((name.to_string(), value.to_string()));
        Ok(())
    }

    fn write_summary(&self, markdown: &str) -> Result<()> {
        self.summaries.lock().unwrap().push(markdown.to_string());
        Ok(())
    }

    fn warning(&self, message: &str) {
        self.warnings.lock().unwrap().push(message.to_string());
    }

    fn fail(&self, message: &str) {
        self.failures.lock().unwrap().push(message.to_string());
    }
}

/// How a [`ScriptedChannel`] behaves when delivered to.
#[derive(Debug, Clone)]
pub enum Script {
    Return(Outcome),
    Panic(&'static str),
}

/// A channel with a scripted result that counts its deliveries.
pub struct ScriptedChannel {
    pub name: String,
    pub script: Script,
    pub delay: Duration,
    pub calls: AtomicUsize,
}

impl ScriptedChannel {
    pub fn new(name: &str, script: Script) -> Self {
        Self {
            name: name.to_string(),
            script,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Channel for ScriptedChannel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn deliver(&self, _context: &NotificationContext) -> Outcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        match &self.script {
            Script::Return(outcome) => outcome.clone(),
            Script::Panic(message) => panic!("{}", message),
        }
    }
}

/// Run metadata for a typical push build.
pub fn run_metadata() -> RunMetadata {
    RunMetadata {
        repository: "acme/widgets".to_string(),
        run_id: "1001".to_string(),
        run_number: "17".to_string(),
        actor: "octocat".to_string(),
        event_name: "push".to_string(),
        git_ref: "refs/heads/main".to_string(),
        sha: "0123abcd".to_string(),
        ..Default::default()
    }
}
