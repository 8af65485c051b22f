//! # Graph Viewer
//!
//! Runs Cypher queries against Neo4j, reshapes the returned nodes and
//! relationships into plain JSON records, and serves them to a browser page
//! that draws the graph.

pub mod adapter;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod legend;
pub mod logging;
pub mod models;
pub mod neo4j;
pub mod server;

pub use adapter::{GraphResultAdapter, QueryOutcome};
pub use config::{Neo4jConfig, ServerConfig};
pub use errors::{ErrorKind, GraphQueryError};
pub use interfaces::GraphSource;
pub use legend::GraphSummary;
pub use models::{GraphBuilder, GraphResult, NodeRecord, RelationshipRecord};
pub use neo4j::Neo4jSource;
