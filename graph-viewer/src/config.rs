// Configuration constants and environment helpers
use axum::http::{HeaderValue, Method};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use tower_http::cors::CorsLayer;

use crate::errors::GraphQueryError;

// Neo4j connection defaults
pub const DEFAULT_NEO4J_URI: &str = "bolt://localhost:7687";
pub const DEFAULT_NEO4J_USER: &str = "neo4j";

// Server configuration
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";
pub const DEFAULT_SERVER_PORT: u16 = 8501;

// Query page defaults
pub const DEFAULT_QUERY: &str = "MATCH (n)-[r]->(m) RETURN n, r, m LIMIT 50";
pub const DEFAULT_GRAPH_KEY: &str = "neo4j_graph";
pub const MIN_GRAPH_HEIGHT: u32 = 400;
pub const MAX_GRAPH_HEIGHT: u32 = 1200;
pub const GRAPH_HEIGHT_STEP: u32 = 50;
pub const DEFAULT_GRAPH_HEIGHT: u32 = 600;

/// Connection parameters for the graph database.
///
/// Built once at startup and handed to `Neo4jSource`; nothing reads the
/// environment after that.
#[derive(Clone, PartialEq, Eq)]
pub struct Neo4jConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    /// Target database name. `None` uses the server's default database.
    pub database: Option<String>,
}

impl Neo4jConfig {
    pub fn new(uri: impl Into<String>, user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            user: user.into(),
            password: password.into(),
            database: None,
        }
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Read the configuration from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `NEO4J_URI`: Bolt endpoint (default: bolt://localhost:7687)
    /// - `NEO4J_USER`: user name (default: neo4j)
    /// - `NEO4J_PASSWORD`: password (default: empty, for servers without auth)
    /// - `NEO4J_DATABASE`: database name (default: server default)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            uri: non_empty("NEO4J_URI").unwrap_or_else(|| DEFAULT_NEO4J_URI.to_string()),
            user: non_empty("NEO4J_USER").unwrap_or_else(|| DEFAULT_NEO4J_USER.to_string()),
            password: lookup("NEO4J_PASSWORD").unwrap_or_default(),
            database: non_empty("NEO4J_DATABASE"),
        }
    }
}

impl fmt::Debug for Neo4jConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Neo4jConfig")
            .field("uri", &self.uri)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}

/// Address the HTTP server binds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], DEFAULT_SERVER_PORT)),
        }
    }
}

impl ServerConfig {
    /// Read `SERVER_HOST` and `SERVER_PORT` from the process environment.
    pub fn from_env() -> Result<Self, GraphQueryError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, GraphQueryError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("SERVER_HOST").unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string());
        let host: IpAddr = host.trim().parse().map_err(|e| {
            GraphQueryError::config(format!("SERVER_HOST must be an IP address: {}", e))
        })?;

        let port = match lookup("SERVER_PORT") {
            Some(port) => port.trim().parse::<u16>().map_err(|e| {
                GraphQueryError::config(format!("SERVER_PORT must be a port number: {}", e))
            })?,
            None => DEFAULT_SERVER_PORT,
        };

        Ok(Self {
            addr: SocketAddr::new(host, port),
        })
    }
}

/// Clamp a requested graph height to the slider range and snap it to the step grid.
pub fn clamp_graph_height(requested: Option<u32>) -> u32 {
    let height = requested
        .unwrap_or(DEFAULT_GRAPH_HEIGHT)
        .clamp(MIN_GRAPH_HEIGHT, MAX_GRAPH_HEIGHT);
    let steps = (height - MIN_GRAPH_HEIGHT + GRAPH_HEIGHT_STEP / 2) / GRAPH_HEIGHT_STEP;
    (MIN_GRAPH_HEIGHT + steps * GRAPH_HEIGHT_STEP).min(MAX_GRAPH_HEIGHT)
}

/// Create CORS layer for localhost development
pub fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://localhost:5173"), // Vite default
            HeaderValue::from_static("http://localhost:8501"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
            HeaderValue::from_static("http://127.0.0.1:5173"),
            HeaderValue::from_static("http://127.0.0.1:8501"),
        ])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_neo4j_config_defaults() {
        let config = Neo4jConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config.uri, DEFAULT_NEO4J_URI);
        assert_eq!(config.user, DEFAULT_NEO4J_USER);
        assert_eq!(config.password, "");
        assert_eq!(config.database, None);
    }

    #[test]
    fn test_neo4j_config_from_env_values() {
        let config = Neo4jConfig::from_lookup(lookup_from(&[
            ("NEO4J_URI", "neo4j://db.internal:7687"),
            ("NEO4J_USER", "reader"),
            ("NEO4J_PASSWORD", "secret"),
            ("NEO4J_DATABASE", "movies"),
        ]));
        assert_eq!(
            config,
            Neo4jConfig::new("neo4j://db.internal:7687", "reader", "secret").with_database("movies")
        );
    }

    #[test]
    fn test_neo4j_config_debug_redacts_password() {
        let config = Neo4jConfig::new("bolt://localhost:7687", "neo4j", "hunter2");
        let printed = format!("{:?}", config);
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn test_server_config() {
        let config = ServerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());

        let config =
            ServerConfig::from_lookup(lookup_from(&[("SERVER_HOST", "0.0.0.0"), ("SERVER_PORT", "9000")]))
                .unwrap();
        assert_eq!(config.addr.to_string(), "0.0.0.0:9000");

        let err = ServerConfig::from_lookup(lookup_from(&[("SERVER_PORT", "http")])).unwrap_err();
        assert!(matches!(err, GraphQueryError::ConfigError(_)));
    }

    #[test]
    fn test_clamp_graph_height() {
        assert_eq!(clamp_graph_height(None), 600);
        assert_eq!(clamp_graph_height(Some(100)), 400);
        assert_eq!(clamp_graph_height(Some(5000)), 1200);
        assert_eq!(clamp_graph_height(Some(630)), 650);
        assert_eq!(clamp_graph_height(Some(620)), 600);
        assert_eq!(clamp_graph_height(Some(1199)), 1200);
    }
}
