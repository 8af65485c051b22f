//! Neo4j connectivity smoke test.
//!
//! Opens a connection with the configured credentials, runs a liveness query
//! and exits non-zero if anything fails.

use graph_viewer::{logging, GraphSource, Neo4jConfig, Neo4jSource};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    logging::init_tracing("probe=info,graph_viewer=info");

    let source = Neo4jSource::new(Neo4jConfig::from_env());
    info!("Connecting to Neo4j at {}...", source.describe());

    match source.verify_connectivity().await {
        Ok(()) => {
            info!("✓ Neo4j is reachable and answering queries");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "✗ Neo4j connectivity check failed");
            Err(anyhow::Error::new(e).context(format!(
                "Could not verify connectivity to {}",
                source.describe()
            )))
        }
    }
}
