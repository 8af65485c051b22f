// Server module - HTTP server setup and routing
pub mod handlers;
pub mod page;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tracing::{info, warn};

use crate::adapter::GraphResultAdapter;
use crate::config::create_cors_layer;
use self::state::AppState;

/// Create the Axum application router with all routes and middleware
pub fn create_app(adapter: GraphResultAdapter) -> Router {
    let state = AppState { adapter };

    Router::new()
        .route("/", get(handlers::index))
        .route("/query", post(handlers::query_handler))
        .route("/probe", get(handlers::probe_handler))
        .route("/health", get(handlers::health_check))
        .layer(create_cors_layer())
        .with_state(state)
}

/// Run the server on the specified address until Ctrl-C
pub async fn run_server(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    info!("Server listening on {}", addr);
    info!("- Graph page: http://{}/", addr);
    info!("- Query endpoint: http://{}/query", addr);
    info!("- Probe endpoint: http://{}/probe", addr);
    info!("- Health endpoint: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            // Without a signal handler the server runs until killed.
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
