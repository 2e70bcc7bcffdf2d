//! Mailwatch - export directory monitor
//!
//! Entry point for the Mailwatch daemon.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use clap::Parser;
use mailwatch::notifier::LogNotifier;
use mailwatch::observability::init_tracing;
use mailwatch::pipeline::{DeliveryPipeline, FallbackRecorder};
use mailwatch::watcher::{DirWatcher, EventFilter};
use mailwatch::{Config, Result};
use tokio_util::sync::CancellationToken;

/// Mailwatch - watches an export directory and mails new files
#[derive(Parser, Debug)]
#[command(name = "mailwatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory to watch for new export files
    #[arg(short, long, env = "MAILWATCH_WATCH_DIR", default_value = "./exports")]
    watch_dir: std::path::PathBuf,

    /// File suffix that triggers a notification (including the dot)
    #[arg(short, long, env = "MAILWATCH_SUFFIX", default_value = ".txt")]
    suffix: String,

    /// Notification recipient address
    #[arg(
        short,
        long,
        env = "MAILWATCH_RECIPIENT",
        default_value = "admin@example.com"
    )]
    recipient: String,

    /// Sender identity on outgoing notifications
    #[arg(long, env = "MAILWATCH_SENDER", default_value = "mailwatch@example.com")]
    sender: String,

    /// Fallback log for undelivered notifications
    #[arg(
        long,
        env = "MAILWATCH_FALLBACK_LOG",
        default_value = "./data/failed-deliveries.log"
    )]
    fallback_log: std::path::PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "MAILWATCH_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Enable JSON logging output
    #[arg(long, env = "MAILWATCH_LOG_JSON")]
    log_json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with configuration
    init_tracing(&cli.log_level, cli.log_json);

    tracing::info!("Mailwatch v{} starting...", env!("CARGO_PKG_VERSION"));

    // Build config from CLI
    let config = Config {
        watch_dir: cli.watch_dir,
        suffix: cli.suffix,
        recipient: cli.recipient,
        sender: cli.sender,
        fallback_log: cli.fallback_log,
        log_level: cli.log_level,
    };

    tracing::debug!(?config, "Configuration loaded");

    // Validate config
    config.validate()?;

    // The watched directory is provisioned at startup if absent.
    std::fs::create_dir_all(&config.watch_dir)?;

    tracing::info!(
        dir = %config.watch_dir.display(),
        suffix = %config.suffix,
        sender = %config.sender,
        recipient = %config.recipient,
        "Monitoring configuration"
    );

    let watcher = DirWatcher::new(&config.watch_dir)?;
    let fallback = FallbackRecorder::open(&config.fallback_log, &config.recipient)?;
    let notifier = LogNotifier::new(&config.sender, &config.recipient);
    let pipeline = DeliveryPipeline::new(EventFilter::new(&config.suffix), notifier, fallback);

    // Clean stop on Ctrl-C
    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            signal_cancel.cancel();
        }
    });

    pipeline.run(watcher, cancel).await;

    tracing::info!("Mailwatch stopped");
    Ok(())
}
