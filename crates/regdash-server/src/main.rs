//! regdash server
//!
//! - Loads `regdash.yaml` (or the path given as the first argument)
//! - Seeds the in-memory registration backend
//! - Serves the dashboard + registration API until Ctrl-C

use std::net::SocketAddr;

use tracing_subscriber::{fmt, EnvFilter};

use regdash_core::error::{RegdashError, Result};
use regdash_server::{app_state::AppState, config, router};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("regdash-server: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "regdash.yaml".to_string());
    let cfg = config::load_from_file(&path)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.log.filter.clone()));
    fmt().with_env_filter(filter).init();

    let listen: SocketAddr = cfg.server.listen.parse().map_err(|e| {
        RegdashError::BadRequest(format!("server.listen must be a valid SocketAddr: {e}"))
    })?;

    let state = AppState::new(cfg)?;
    let app = router::build_router(state.clone());

    tracing::info!(%listen, config = %path, "regdash-server starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| RegdashError::Internal(format!("failed to bind {listen}: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| RegdashError::Internal(format!("server failed: {e}")))?;

    state.shutdown();
    tracing::info!("regdash-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "ctrl-c handler unavailable");
        std::future::pending::<()>().await;
    }
}
