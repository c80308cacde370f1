use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::{config::ServerConfig, errors::Error};

use super::routes::{build_router, ApiState};

/// Bind the configured address and serve until Ctrl-C.
pub async fn start_api_server(config: &ServerConfig, state: ApiState) -> crate::Result<()> {
    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .map_err(|e| Error::config(format!("Invalid API address: {}", e)))?;

    let router: Router = build_router(state);
    let listener = TcpListener::bind(addr).await?;

    info!(address = %addr, "Starting HTTP API server");
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "API server shutdown listener failed");
            }
        })
        .await?;

    info!("API server shutdown completed");
    Ok(())
}
