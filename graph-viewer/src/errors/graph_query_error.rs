//! Graph query error types.
//!
//! Covers configuration problems, connectivity and authentication failures
//! against the database, and failures reported by the database while running
//! a query. An empty result is not an error and has no variant here.

use thiserror::Error;

/// Unified errors from graph query operations.
///
/// Returned by the `GraphSource` trait and by `GraphResultAdapter`. Every
/// variant carries a human-readable reason that can be shown to the user as is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphQueryError {
    /// The environment holds an unusable configuration value.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Could not reach or authenticate against the database.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The database rejected the query or failed while running it.
    #[error("Query error: {0}")]
    QueryError(String),

    /// The query text was rejected before contacting the database.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// The liveness query returned something other than the expected value.
    #[error("Probe error: {0}")]
    ProbeError(String),
}

/// Coarse classification of a [`GraphQueryError`], used to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Connection,
    Query,
    Input,
}

impl GraphQueryError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a query error.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::QueryError(msg.into())
    }

    /// Create an invalid query error.
    pub fn invalid_query(msg: impl Into<String>) -> Self {
        Self::InvalidQuery(msg.into())
    }

    /// Create a probe error.
    pub fn probe(msg: impl Into<String>) -> Self {
        Self::ProbeError(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigError(_) => ErrorKind::Config,
            Self::ConnectionError(_) | Self::ProbeError(_) => ErrorKind::Connection,
            Self::QueryError(_) => ErrorKind::Query,
            Self::InvalidQuery(_) => ErrorKind::Input,
        }
    }
}

impl From<neo4rs::Error> for GraphQueryError {
    fn from(err: neo4rs::Error) -> Self {
        match &err {
            neo4rs::Error::IOError { .. }
            | neo4rs::Error::ConnectionError
            | neo4rs::Error::AuthenticationError(_) => Self::connection(err.to_string()),
            _ => Self::query(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(GraphQueryError::config("x").kind(), ErrorKind::Config);
        assert_eq!(GraphQueryError::connection("x").kind(), ErrorKind::Connection);
        assert_eq!(GraphQueryError::probe("x").kind(), ErrorKind::Connection);
        assert_eq!(GraphQueryError::query("x").kind(), ErrorKind::Query);
        assert_eq!(GraphQueryError::invalid_query("x").kind(), ErrorKind::Input);
    }

    #[test]
    fn test_display_includes_reason() {
        let err = GraphQueryError::connection("connection refused");
        assert_eq!(err.to_string(), "Connection error: connection refused");
    }
}
