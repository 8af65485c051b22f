//! Graph viewer server entry point.
//!
//! Serves the query page and runs each submitted query against Neo4j.

use anyhow::Context;
use graph_viewer::{logging, server, GraphResultAdapter, Neo4jConfig, Neo4jSource, ServerConfig};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    logging::init_tracing("graph_viewer=info");

    info!(
        service_name = "graph-viewer",
        service_version = env!("CARGO_PKG_VERSION"),
        "Starting graph viewer"
    );

    let neo4j_config = Neo4jConfig::from_env();
    let server_config = ServerConfig::from_env().context("Invalid server configuration")?;
    info!(
        neo4j_uri = %neo4j_config.uri,
        neo4j_user = %neo4j_config.user,
        neo4j_database = ?neo4j_config.database,
        "Loaded configuration"
    );

    let adapter = GraphResultAdapter::new(Arc::new(Neo4jSource::new(neo4j_config)));
    let app = server::create_app(adapter);

    if let Err(e) = server::run_server(app, server_config.addr).await {
        error!(error = %e, "Server error");
        return Err(e);
    }

    info!("Graph viewer stopped");
    Ok(())
}
