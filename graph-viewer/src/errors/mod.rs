//! Error types for graph queries.
//!
//! This module provides a unified error type for everything that can go wrong
//! between receiving a query string and returning a graph result.

mod graph_query_error;

pub use graph_query_error::{ErrorKind, GraphQueryError};
