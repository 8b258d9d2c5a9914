use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use chatrelay::config::Config;
use chatrelay::orchestrator::Orchestrator;
use chatrelay::server::{AppState, build_app};

#[derive(Debug, Parser)]
#[command(name = "chatrelay", version, about = "Relay chat turns to an Azure OpenAI deployment")]
struct Args {
    /// Path to the YAML config file. A missing file means defaults plus environment.
    #[arg(long, default_value = "chatrelay.yaml")]
    config: PathBuf,

    /// Override `server.host`.
    #[arg(long)]
    host: Option<String>,

    /// Override `server.port`.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = Config::load(&args.config)
        .await
        .with_context(|| format!("loading {}", args.config.display()))?;
    config.upstream.apply_env();
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let relay = config.upstream.resolve()?;
    info!(
        endpoint = %relay.endpoint,
        model = %relay.model,
        debug = relay.debug,
        "upstream configured"
    );

    let state = AppState {
        orchestrator: Orchestrator::from_config(&relay),
    };
    let app = build_app(state, config.server.request_timeout_seconds);

    let listener = TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    info!(addr = %listener.local_addr()?, "chatrelay listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
    }
    info!("shutting down");
}
