//! Interface definitions for graph sources.
//!
//! This module defines the abstract `GraphSource` trait so the adapter can be
//! driven by Neo4j in production and by in-memory mocks in tests.

mod graph_source;

pub use graph_source::GraphSource;
