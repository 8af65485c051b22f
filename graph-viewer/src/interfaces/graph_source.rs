//! Graph source trait definition.

use async_trait::async_trait;

use crate::errors::GraphQueryError;
use crate::models::GraphResult;

/// Abstracts the database that answers graph queries.
///
/// Implementations own their connection parameters and are expected to open
/// a connection per call and release it before returning, on success and on
/// failure alike. They hold no state between calls.
#[async_trait]
pub trait GraphSource: Send + Sync {
    /// Execute `query` and collect every node and relationship it returns.
    ///
    /// # Returns
    ///
    /// * `Ok(GraphResult)` - Nodes and relationships in driver iteration order,
    ///   deduplicated by identity
    /// * `Err(GraphQueryError::ConnectionError)` - If the database is unreachable
    ///   or rejects the credentials
    /// * `Err(GraphQueryError::QueryError)` - If the query fails to run
    async fn fetch_graph(&self, query: &str) -> Result<GraphResult, GraphQueryError>;

    /// Open a connection and run a trivial liveness query.
    async fn verify_connectivity(&self) -> Result<(), GraphQueryError>;

    /// Human-readable location of the database, used in log lines.
    fn describe(&self) -> String;
}
