//! termgate daemon
//!
//! Serves screen-based terminal sessions over SSH.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tg_core::config::{self, AppConfig};
use tg_server::server::{load_or_generate_host_key, SshServer};
use tg_server::ServerState;

#[derive(Parser)]
#[command(name = "termgate")]
#[command(about = "Screen-based terminal sessions over SSH")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind (overrides config)
    #[arg(long, env = "TERMGATE_HOST")]
    host: Option<String>,

    /// Port to bind (overrides config)
    #[arg(short, long, env = "TERMGATE_PORT")]
    port: Option<u16>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, env = "TERMGATE_LOG_LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before logging starts since it carries the log level
    let (mut config, load_warning) = load(&args)?;

    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(level) = args.log_level {
        config.log_level = level;
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("termgate starting...");
    if let Some(warning) = load_warning {
        tracing::warn!("{}", warning);
    }

    config
        .prepare()
        .context("Failed to prepare authentication strategies")?;
    tracing::info!("Loaded {} screen slot(s)", config.screens.len());

    let host_key = load_or_generate_host_key(&config.server.host_key_path).await?;
    if let Ok(public) = host_key.clone_public_key() {
        tracing::info!("Host key fingerprint: {}", public.fingerprint());
    }

    let bind_addr = config.server.bind_address();
    let shutdown_timeout = config.server.shutdown_timeout;

    let cancel = CancellationToken::new();
    let state = Arc::new(ServerState::new(config, &cancel));

    spawn_signal_handler(cancel.clone());

    let server = SshServer::new(host_key, Arc::clone(&state), cancel.clone());
    let result = server.run(&bind_addr).await;

    // Listener failures still close whatever sessions exist
    cancel.cancel();
    tracing::info!("Waiting up to {:?} for sessions to close", shutdown_timeout);
    let abandoned = state.sessions.shutdown(shutdown_timeout).await;
    if abandoned > 0 {
        tracing::warn!("Abandoned {} session(s)", abandoned);
    }

    result?;
    tracing::info!("termgate shutdown complete");
    Ok(())
}

/// Load the config file, returning a warning to log once logging is up
fn load(args: &Args) -> Result<(AppConfig, Option<String>)> {
    if let Some(config_path) = &args.config {
        let config = config::load_config(config_path)
            .with_context(|| format!("Failed to load config from {:?}", config_path))?;
        return Ok((config, None));
    }

    let default_path = config::default_config_path();
    if !default_path.exists() {
        return Ok((
            AppConfig::default(),
            Some("No config file found, using defaults".to_string()),
        ));
    }

    match config::load_config(&default_path) {
        Ok(config) => Ok((config, None)),
        Err(e) => Ok((
            AppConfig::default(),
            Some(format!("Failed to load config from {:?}: {}", default_path, e)),
        )),
    }
}

fn spawn_signal_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => {
                    tracing::error!("Failed to install SIGTERM handler: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                tracing::info!("Received Ctrl+C, initiating shutdown...");
            }
            _ = terminate => {
                tracing::info!("Received SIGTERM, initiating shutdown...");
            }
        }

        cancel.cancel();
    });
}
