//! Concurrent fan-out of one notification to every channel.
//!
//! Every channel runs in its own task. All tasks are spawned before any is
//! awaited and are joined together, so the dispatch takes as long as the
//! slowest channel. A task that panics, is cancelled or overruns its deadline
//! is recorded as a failed outcome for that channel only.

use crate::context::NotificationContext;
use crate::core::{Channel, DispatchResult, Outcome};
use futures::future::join_all;
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinError;
use tracing::{debug, error, warn};

/// Tuning for a dispatch.
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchOptions {
    /// Deadline applied to each channel independently.
    pub channel_timeout: Option<Duration>,
}

/// Delivers `context` through every channel and returns one result per
/// channel, in input order.
pub async fn dispatch(
    channels: &[Arc<dyn Channel>],
    context: Arc<NotificationContext>,
    options: DispatchOptions,
) -> Vec<DispatchResult> {
    let names: Vec<String> = channels.iter().map(|c| c.name().to_string()).collect();
    debug!(channels = ?names, "Dispatching notification.");

    let handles = channels.iter().map(|channel| {
        let channel = Arc::clone(channel);
        let context = Arc::clone(&context);
        tokio::spawn(run_channel(channel, context, options.channel_timeout))
    });
    // Collecting spawns every task before the join point.
    let handles: Vec<_> = handles.collect();

    let results = join_all(handles).await;

    names
        .into_iter()
        .zip(results)
        .map(|(channel, result)| {
            let outcome = result.unwrap_or_else(|e| {
                error!(channel = %channel, "Channel task did not complete: {}", e);
                Outcome::failed(describe_join_error(e))
            });
            DispatchResult { channel, outcome }
        })
        .collect()
}

async fn run_channel(
    channel: Arc<dyn Channel>,
    context: Arc<NotificationContext>,
    timeout: Option<Duration>,
) -> Outcome {
    let delivery = channel.deliver(&context);
    let Some(limit) = timeout else {
        return delivery.await;
    };

    match tokio::time::timeout(limit, delivery).await {
        Ok(outcome) => outcome,
        Err(_) => {
            warn!(channel = channel.name(), ?limit, "Channel timed out.");
            Outcome::failed(format!("timed out after {:?}", limit))
        }
    }
}

fn describe_join_error(err: JoinError) -> String {
    if err.is_cancelled() {
        return "channel task was cancelled".to_string();
    }
    match err.try_into_panic() {
        Ok(payload) => format!("channel panicked: {}", panic_message(payload.as_ref())),
        Err(err) => err.to_string(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
