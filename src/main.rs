//! notify-cascade - send one message to Slack, email and a webhook.
//!
//! Runs on a single-threaded runtime; the channels run concurrently on it
//! through non-blocking I/O.

use clap::Parser;
use notify_cascade::{app::App, cli::Cli, config::Config, publish};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let publisher = publish::detect();

    // Load configuration by layering sources: defaults, file, action inputs,
    // environment, and CLI args.
    let config = match Config::load(&cli) {
        Ok(config) => config,
        Err(err) => {
            init_tracing("info");
            publisher.fail(&err.to_string());
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.core.log_level);
    info!("notify-cascade starting up...");

    let app = match App::builder(config).build() {
        Ok(app) => app,
        Err(err) => {
            error!("Invocation aborted before dispatch.");
            publisher.fail(&err.to_string());
            return ExitCode::FAILURE;
        }
    };

    app.run(publisher.as_ref()).await;
    ExitCode::SUCCESS
}

/// Logs go to stderr so stdout stays free for workflow commands.
fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
