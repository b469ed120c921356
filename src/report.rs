//! Aggregation of channel outcomes into the run report.

use crate::core::{DispatchResult, Outcome};

/// Warning raised when at least one channel failed.
pub const FAILURE_WARNING: &str = "One or more channels failed. See outputs for details.";

/// The summary of one dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryReport {
    rows: Vec<DispatchResult>,
    any_failed: bool,
}

/// Builds the report for a set of dispatch results.
pub fn aggregate(results: &[DispatchResult]) -> SummaryReport {
    SummaryReport {
        rows: results.to_vec(),
        any_failed: results.iter().any(|r| r.outcome.is_failed()),
    }
}

/// The symbol shown for an outcome in the summary table.
pub fn display_symbol(outcome: &Outcome) -> &'static str {
    match outcome {
        Outcome::Sent => "✅ sent",
        Outcome::Skipped => "⏭️ skipped",
        Outcome::Failed { .. } => "❌ failed",
    }
}

impl SummaryReport {
    pub fn rows(&self) -> &[DispatchResult] {
        &self.rows
    }

    pub fn any_failed(&self) -> bool {
        self.any_failed
    }

    /// The warning to raise for this run, if any.
    pub fn warning(&self) -> Option<&'static str> {
        self.any_failed.then_some(FAILURE_WARNING)
    }

    /// Status values to publish, keyed `<channel>-status`.
    pub fn status_outputs(&self) -> Vec<(String, &'static str)> {
        self.rows
            .iter()
            .map(|row| (format!("{}-status", row.channel), row.outcome.status()))
            .collect()
    }

    /// A one-line `name=status` digest for logs.
    pub fn digest(&self) -> String {
        self.rows
            .iter()
            .map(|row| format!("{}={}", row.channel, row.outcome.status()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Renders the markdown step summary: a heading, the raw message and the
    /// status table.
    pub fn to_markdown(&self, title: &str, message: &str) -> String {
        let rows: String = self
            .rows
            .iter()
            .map(|row| {
                format!(
                    "| {} | {} |\n",
                    display_name(&row.channel),
                    display_symbol(&row.outcome)
                )
            })
            .collect();

        format!(
            "# notify-cascade: {title}\n\n{message}\n\n| Channel | Status |\n|---------|--------|\n{rows}"
        )
    }
}

/// Capitalizes the channel name for display ("slack" -> "Slack").
fn display_name(channel: &str) -> String {
    let mut chars = channel.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
