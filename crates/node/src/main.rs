//! Station node binary.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use station_gateway::{LedgerGateway, MemoryLedger};
use station_gateway_http::{HttpGateway, HttpGatewayConfig};
use station_node::{router, AppState};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "station-node", about = "HTTP front-end over a permissioned ledger")]
struct Settings {
    /// Address to listen on.
    #[arg(long, env = "STATION_LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    listen_addr: String,

    /// Base URL of the ledger peer's REST bridge. When empty, the node runs
    /// against an in-process ledger instead of a remote peer.
    #[arg(long, env = "STATION_PEER_ENDPOINT", default_value = "")]
    peer_endpoint: String,

    /// Ledger channel all calls are scoped to.
    #[arg(long, env = "STATION_CHANNEL", default_value = "mychannel")]
    channel: String,

    /// How many seconds an invocation waits for commit confirmation before
    /// resolving to a timed-out outcome.
    #[arg(long, env = "STATION_COMMIT_WAIT_SECS", default_value_t = 30)]
    commit_wait_secs: u64,
}

#[derive(Debug, Error)]
enum NodeError {
    #[error("gateway setup failed: {0}")]
    Gateway(#[from] station_gateway::GatewayError),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

fn build_gateway(settings: &Settings) -> Result<Arc<dyn LedgerGateway>, NodeError> {
    if settings.peer_endpoint.trim().is_empty() {
        tracing::warn!("no peer endpoint configured; using the in-process ledger");
        return Ok(Arc::new(MemoryLedger::new()));
    }

    let config = HttpGatewayConfig::builder()
        .endpoint(settings.peer_endpoint.clone())
        .channel(settings.channel.clone())
        .commit_wait(Duration::from_secs(settings.commit_wait_secs))
        .build()?;
    Ok(Arc::new(HttpGateway::new(config)?))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install ctrl-c handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => tracing::error!(error = %err, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), NodeError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let settings = Settings::parse();
    let gateway = build_gateway(&settings)?;
    let state = AppState::new(gateway);

    let listener = tokio::net::TcpListener::bind(&settings.listen_addr).await?;
    tracing::info!(addr = %settings.listen_addr, "station node listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
