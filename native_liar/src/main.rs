//! Main entry point for the Liar Game server.

use native_liar::{cli, config, server};

use anyhow::Context;
use clap::Parser;
use config::Config;
use server::AppState;
use std::net::{SocketAddr, TcpListener};
use std::path::PathBuf;

/// Minimal server entrypoint: parse CLI args and run the server.
///
/// Usage:
///   liar-server [--config PATH] [--bots N] [--rounds N]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = cli::ServerCli::parse();

    // Initialize tracing subscriber for logging.
    // If debug is on: show everything at DEBUG level.
    // If debug is off: our crates at INFO, everything else at WARN to reduce noise.
    let log_filter = if cli.debug {
        "debug".to_string()
    } else {
        "native_liar=info,liar_shared=info,warn".to_string()
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        // Use compact format in non-debug mode for cleaner output
        .with_target(cli.debug)
        .with_thread_ids(cli.debug)
        .with_file(cli.debug)
        .with_line_number(cli.debug)
        .init();

    let config_path: PathBuf = cli.config.clone();

    // Load or create config file (creates file if missing), applying CLI
    // overrides and persisting them.
    let cfg = Config::load_or_create_with_override(&config_path, cli.bots, cli.rounds)
        .with_context(|| format!("loading or creating config '{}'", config_path.display()))?;

    tracing::info!(config = %config_path.display(), bots = cfg.bots, rounds = cfg.rounds);

    // Initialize shared state for the server.
    let state = AppState::new(cfg, Some(config_path));

    // Find first available port starting from 3000
    let port = find_available_port(3000)
        .map_err(|e| anyhow::anyhow!("Could not find an available port: {}", e))?;
    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    tracing::info!(port, "starting server");
    if port != 3000 {
        tracing::warn!(port, "port 3000 was not available, using alternative port");
    }

    server::run_server(addr, state).await?;
    Ok(())
}

/// Find the first available port starting from the given port number
fn find_available_port(start_port: u16) -> anyhow::Result<u16> {
    for port in start_port..start_port + 100 {
        match TcpListener::bind(("127.0.0.1", port)) {
            Ok(_) => return Ok(port),
            Err(_) => continue,
        }
    }
    Err(anyhow::anyhow!(
        "No available ports found in range {}..{}",
        start_port,
        start_port + 100
    ))
}
