use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{runtime, HttpRemoteStore, MessageReader};
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod console;
mod terminal;

use console::StdinButton;
use terminal::TerminalDisplay;

/// Terminal stand-in for the message display box.
///
/// Press Enter to advance to the next message; type `/send <text>` to leave one.
#[derive(Parser, Debug)]
#[command(name = "lovebox-device")]
struct Args {
    /// TOML settings file. A missing default file is ignored.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    store_url: Option<String>,
    #[arg(long)]
    width: Option<usize>,
    #[arg(long)]
    poll_interval_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = config::load(&config::Overrides {
        config_path: args.config,
        store_url: args.store_url,
        line_width: args.width,
        poll_interval_secs: args.poll_interval_secs,
    })
    .context("invalid device configuration")?;

    let store = Arc::new(
        HttpRemoteStore::new(&config.store_url, config.request_timeout)
            .context("failed to build store client")?,
    );
    info!(store = %store.base_url(), "lovebox device starting");

    let mut button = StdinButton::new();
    tokio::spawn(console::run_console(
        BufReader::new(tokio::io::stdin()),
        button.presses(),
        Arc::clone(&store),
    ));

    let display = TerminalDisplay::stdout(config.line_width);
    let mut reader = MessageReader::new(store, display, &config);
    runtime::run(&mut reader, &mut button, &config, shutdown_signal()).await;

    info!("lovebox device stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::warn!(%error, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::warn!(%error, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
