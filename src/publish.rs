//! Publishing of run results to the host environment.
//!
//! Inside GitHub Actions, outputs and the step summary are appended to the
//! files named by `$GITHUB_OUTPUT` and `$GITHUB_STEP_SUMMARY`, and warnings
//! and errors are emitted as workflow commands on stdout. Elsewhere the
//! results go to the log and the summary is printed.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Where the results of an invocation are published.
pub trait Publisher: Send + Sync {
    /// Publishes a named output value for downstream steps.
    fn set_output(&self, name: &str, value: &str) -> Result<()>;

    /// Publishes the human-readable run summary.
    fn write_summary(&self, markdown: &str) -> Result<()>;

    /// Raises a run-level warning.
    fn warning(&self, message: &str);

    /// Reports that the invocation failed.
    fn fail(&self, message: &str);
}

/// Picks the GitHub Actions publisher when running on an Actions runner.
pub fn detect() -> Box<dyn Publisher> {
    match GitHubActions::from_env() {
        Some(actions) => Box::new(actions),
        None => Box::new(Console),
    }
}

/// Publishes through the GitHub Actions runner files and workflow commands.
#[derive(Debug, Clone, Default)]
pub struct GitHubActions {
    output_path: Option<PathBuf>,
    summary_path: Option<PathBuf>,
}

impl GitHubActions {
    /// Returns `Some` when `GITHUB_ACTIONS=true`.
    pub fn from_env() -> Option<Self> {
        let in_actions = std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true");
        in_actions.then(|| Self {
            output_path: std::env::var_os("GITHUB_OUTPUT").map(PathBuf::from),
            summary_path: std::env::var_os("GITHUB_STEP_SUMMARY").map(PathBuf::from),
        })
    }

    pub fn new(output_path: Option<PathBuf>, summary_path: Option<PathBuf>) -> Self {
        Self {
            output_path,
            summary_path,
        }
    }
}

/// Delimiter for multi-line output values.
const OUTPUT_DELIMITER: &str = "NOTIFY_CASCADE_EOF";

fn append(path: &Path, text: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    file.write_all(text.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))
}

/// Escapes a workflow command message.
fn escape_command_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

impl Publisher for GitHubActions {
    fn set_output(&self, name: &str, value: &str) -> Result<()> {
        let Some(path) = &self.output_path else {
            warn!(name, "GITHUB_OUTPUT is not set, output not published");
            return Ok(());
        };
        let line = if value.contains('\n') {
            format!("{name}<<{OUTPUT_DELIMITER}\n{value}\n{OUTPUT_DELIMITER}\n")
        } else {
            format!("{name}={value}\n")
        };
        append(path, &line)
    }

    fn write_summary(&self, markdown: &str) -> Result<()> {
        let Some(path) = &self.summary_path else {
            warn!("GITHUB_STEP_SUMMARY is not set, summary not written");
            return Ok(());
        };
        append(path, markdown)
    }

    fn warning(&self, message: &str) {
        println!("::warning::{}", escape_command_data(message));
    }

    fn fail(&self, message: &str) {
        println!("::error::{}", escape_command_data(message));
    }
}

/// Publishes to the log and stdout, for use outside Actions.
#[derive(Debug, Clone, Copy, Default)]
pub struct Console;

impl Publisher for Console {
    fn set_output(&self, name: &str, value: &str) -> Result<()> {
        info!(name, value, "output");
        Ok(())
    }

    fn write_summary(&self, markdown: &str) -> Result<()> {
        println!("{}", markdown);
        Ok(())
    }

    fn warning(&self, message: &str) {
        warn!("{}", message);
    }

    fn fail(&self, message: &str) {
        error!("{}", message);
        eprintln!("Error: {}", message);
    }
}
