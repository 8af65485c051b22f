// Neo4j-backed graph source
use async_trait::async_trait;
use neo4rs::{ConfigBuilder, Graph, Query};
use tracing::{debug, info};

use crate::config::Neo4jConfig;
use crate::errors::GraphQueryError;
use crate::interfaces::GraphSource;
use crate::models::{GraphBuilder, GraphResult};
use crate::neo4j::convert::collect_row;

const LIVENESS_QUERY: &str = "RETURN 1 AS ok";

/// Runs queries against a Neo4j server.
///
/// Every call builds its own single-connection `Graph` from the stored
/// configuration and drops it before returning, so no connection outlives
/// the call that opened it.
pub struct Neo4jSource {
    config: Neo4jConfig,
}

impl Neo4jSource {
    pub fn new(config: Neo4jConfig) -> Self {
        Self { config }
    }

    /// Open a scoped connection to the database.
    fn connect(&self) -> Result<Graph, GraphQueryError> {
        let mut builder = ConfigBuilder::default()
            .uri(self.config.uri.as_str())
            .user(self.config.user.as_str())
            .password(self.config.password.as_str())
            .max_connections(1);
        if let Some(database) = &self.config.database {
            builder = builder.db(database.as_str());
        }

        let config = builder
            .build()
            .map_err(|e| GraphQueryError::config(format!("Invalid Neo4j configuration: {}", e)))?;

        Graph::connect(config).map_err(|e| {
            GraphQueryError::connection(format!(
                "Failed to connect to Neo4j at {}: {}",
                self.config.uri, e
            ))
        })
    }
}

#[async_trait]
impl GraphSource for Neo4jSource {
    async fn fetch_graph(&self, query: &str) -> Result<GraphResult, GraphQueryError> {
        let graph = self.connect()?;

        let mut rows = graph.execute(Query::new(query.to_string())).await?;

        let mut builder = GraphBuilder::new();
        let mut row_count = 0usize;
        while let Some(row) = rows.next().await? {
            collect_row(&row, &mut builder)?;
            row_count += 1;
        }

        let result = builder.build();
        debug!(
            rows = row_count,
            nodes = result.nodes.len(),
            relationships = result.relationships.len(),
            "Collected graph from query rows"
        );
        Ok(result)
    }

    async fn verify_connectivity(&self) -> Result<(), GraphQueryError> {
        let graph = self.connect()?;

        let mut rows = graph.execute(Query::new(LIVENESS_QUERY.to_string())).await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| GraphQueryError::probe("Liveness query returned no rows"))?;
        let ok: i64 = row
            .get("ok")
            .map_err(|e| GraphQueryError::probe(format!("Unexpected liveness result: {}", e)))?;

        if ok != 1 {
            return Err(GraphQueryError::probe(format!(
                "Liveness query returned {} instead of 1",
                ok
            )));
        }

        info!(uri = %self.config.uri, "Neo4j connectivity verified");
        Ok(())
    }

    fn describe(&self) -> String {
        match &self.config.database {
            Some(database) => format!("{} (database {})", self.config.uri, database),
            None => self.config.uri.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_includes_database() {
        let source = Neo4jSource::new(
            Neo4jConfig::new("bolt://localhost:7687", "neo4j", "").with_database("movies"),
        );
        assert_eq!(source.describe(), "bolt://localhost:7687 (database movies)");

        let source = Neo4jSource::new(Neo4jConfig::new("bolt://localhost:7687", "neo4j", ""));
        assert_eq!(source.describe(), "bolt://localhost:7687");
    }
}
