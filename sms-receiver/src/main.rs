//! SMS Receiver (sms-receiver) - console host
//!
//! Runs the receiver playback core with logging collaborators. Inbound
//! events are read from stdin as JSON lines; status events are written to
//! stdout as JSON lines.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use sms_common::{EventBus, SmsEvent};
use sms_receiver::config::CONFIG_ENV_VAR;
use sms_receiver::console::{console_host, parse_event_line};
use sms_receiver::{ReceiverConfig, ReceiverEvent, ReceiverService};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for sms-receiver
#[derive(Parser, Debug)]
#[command(name = "sms-receiver")]
#[command(about = "Cast media receiver playback core (console host)")]
#[command(version)]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose receiver diagnostics
    #[arg(short, long, env = "SMS_RECEIVER_DEBUG")]
    debug: bool,

    /// Behave as an audio-only device (no visual transitions)
    #[arg(long)]
    no_display: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path =
        sms_common::config::resolve_config_path(args.config.as_deref(), CONFIG_ENV_VAR);
    let mut config =
        ReceiverConfig::load(config_path.as_deref()).context("Failed to load configuration")?;
    if args.debug {
        config.logging.debug = true;
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter_directive().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting SMS receiver (display: {})", !args.no_display);
    if let Some(path) = &config_path {
        info!("Config file: {}", path.display());
    }

    let events = EventBus::default();
    let mut status_rx = events.subscribe();
    let (notify_tx, mut notify_rx) = mpsc::unbounded_channel::<ReceiverEvent>();

    let host = console_host(!args.no_display, notify_tx);
    let (handle, task) = ReceiverService::spawn(config, host, events)
        .context("Failed to start receiver service")?;
    handle.send(ReceiverEvent::Ready)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            line = lines.next_line(), if stdin_open => {
                match line.context("Failed to read stdin")? {
                    Some(line) => match parse_event_line(&line) {
                        Ok(Some(event)) => handle.send(event)?,
                        Ok(None) => {}
                        Err(e) => warn!("Ignoring malformed event: {}", e),
                    },
                    None => {
                        // Keep running timers until teardown or a signal
                        info!("stdin closed");
                        stdin_open = false;
                    }
                }
            }
            Some(event) = notify_rx.recv() => {
                handle.send(event)?;
            }
            status = status_rx.recv() => {
                match status {
                    Ok(event) => {
                        println!("{}", serde_json::to_string(&event)?);
                        if let SmsEvent::TeardownRequested { reason, .. } = event {
                            info!("Session ended: {}", reason);
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("Status output lagged, {} events dropped", n);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            _ = &mut shutdown => break,
        }
    }

    debug!("Stopping receiver service");
    // The service may already have exited
    let _ = handle.shutdown();
    task.await.context("Receiver service task failed")?;

    info!("Shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
