//! Graph result adapter.
//!
//! The entry point the HTTP handlers and binaries use to run a query and get
//! back transport records. Connection handling and value conversion live in
//! the injected `GraphSource`; this layer validates input, classifies the
//! outcome and logs it.

use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

use crate::errors::GraphQueryError;
use crate::interfaces::GraphSource;
use crate::models::GraphResult;

/// Result of one user-triggered query, ready for presentation.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// At least one node came back.
    Found(GraphResult),
    /// The query succeeded but returned no nodes.
    Empty,
    /// The query could not be run. Nothing partial is kept.
    Failed(GraphQueryError),
}

/// Runs graph queries against a `GraphSource` and returns transport records.
///
/// Holds no state between calls besides the source itself.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use graph_viewer::{GraphResultAdapter, Neo4jConfig, Neo4jSource};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let source = Neo4jSource::new(Neo4jConfig::from_env());
/// let adapter = GraphResultAdapter::new(Arc::new(source));
///
/// let graph = adapter
///     .query_graph("MATCH (n)-[r]->(m) RETURN n, r, m LIMIT 50")
///     .await?;
/// println!("{} nodes", graph.nodes.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct GraphResultAdapter {
    source: Arc<dyn GraphSource>,
}

impl GraphResultAdapter {
    pub fn new(source: Arc<dyn GraphSource>) -> Self {
        Self { source }
    }

    /// Execute `query` and return every node and relationship it produced.
    ///
    /// Relationships pointing at nodes outside the result are kept as they
    /// are; only a warning is logged.
    ///
    /// # Returns
    ///
    /// * `Ok(GraphResult)` - Possibly empty graph in driver iteration order
    /// * `Err(GraphQueryError::InvalidQuery)` - If the query is blank
    /// * `Err(GraphQueryError)` - Any failure reported by the source, unchanged
    pub async fn query_graph(&self, query: &str) -> Result<GraphResult, GraphQueryError> {
        if query.trim().is_empty() {
            return Err(GraphQueryError::invalid_query("Query must not be empty"));
        }

        let started = Instant::now();
        let graph = self.source.fetch_graph(query).await?;

        let dangling = graph.dangling_relationships().len();
        if dangling > 0 {
            warn!(
                dangling,
                "Query returned relationships whose endpoints are not in the node set"
            );
        }

        info!(
            source = %self.source.describe(),
            nodes = graph.nodes.len(),
            relationships = graph.relationships.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Graph query completed"
        );
        Ok(graph)
    }

    /// Execute `query` and classify the result as found, empty or failed.
    pub async fn run(&self, query: &str) -> QueryOutcome {
        match self.query_graph(query).await {
            Ok(graph) if graph.is_empty() => QueryOutcome::Empty,
            Ok(graph) => QueryOutcome::Found(graph),
            Err(e) => {
                error!(error = %e, source = %self.source.describe(), "Graph query failed");
                QueryOutcome::Failed(e)
            }
        }
    }

    /// Check that the database is reachable and answers queries.
    pub async fn probe(&self) -> Result<(), GraphQueryError> {
        self.source.verify_connectivity().await
    }

    pub fn describe_source(&self) -> String {
        self.source.describe()
    }
}
