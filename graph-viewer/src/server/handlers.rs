// HTTP request handlers
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::adapter::QueryOutcome;
use crate::config::{clamp_graph_height, DEFAULT_GRAPH_KEY};
use crate::errors::{ErrorKind, GraphQueryError};
use crate::legend::GraphSummary;
use crate::models::GraphResult;
use crate::server::page;
use crate::server::state::AppState;

pub const EMPTY_RESULT_MESSAGE: &str = "No nodes found in the query result.";

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQueryRequest {
    pub query: String,
    pub height: Option<u32>,
    pub key: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Warning,
    Error,
}

/// Payload for the rendering page: the graph plus its display parameters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQueryResponse {
    pub status: ResponseStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph_data: Option<GraphResult>,
    pub height: u32,
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<GraphSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProbeResponse {
    pub status: ResponseStatus,
    pub message: String,
}

/// Status code used when a query fails with the given error.
pub fn error_status(err: &GraphQueryError) -> StatusCode {
    match err.kind() {
        ErrorKind::Input => StatusCode::BAD_REQUEST,
        ErrorKind::Config => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorKind::Connection | ErrorKind::Query => StatusCode::BAD_GATEWAY,
    }
}

/// Query page
pub async fn index() -> Html<String> {
    Html(page::render())
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "graph-viewer is running")
}

/// Query endpoint - runs the Cypher query and returns the graph for rendering
pub async fn query_handler(
    State(state): State<AppState>,
    payload: Result<Json<GraphQueryRequest>, JsonRejection>,
) -> impl IntoResponse {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Rejected malformed query request");
            return (
                StatusCode::BAD_REQUEST,
                Json(GraphQueryResponse {
                    status: ResponseStatus::Error,
                    message: format!("Error: Invalid request: {}", rejection.body_text()),
                    graph_data: None,
                    height: clamp_graph_height(None),
                    key: DEFAULT_GRAPH_KEY.to_string(),
                    summary: None,
                }),
            );
        }
    };

    let height = clamp_graph_height(payload.height);
    let key = payload
        .key
        .filter(|k| !k.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_GRAPH_KEY.to_string());

    info!(
        query_len = payload.query.len(),
        height,
        key = %key,
        "Received graph query"
    );

    let (status_code, response) = match state.adapter.run(&payload.query).await {
        QueryOutcome::Found(graph) => {
            let summary = GraphSummary::from_graph(&graph);
            (
                StatusCode::OK,
                GraphQueryResponse {
                    status: ResponseStatus::Success,
                    message: summary.message(),
                    graph_data: Some(graph),
                    height,
                    key,
                    summary: Some(summary),
                },
            )
        }
        QueryOutcome::Empty => {
            warn!("Query returned no nodes");
            (
                StatusCode::OK,
                GraphQueryResponse {
                    status: ResponseStatus::Warning,
                    message: EMPTY_RESULT_MESSAGE.to_string(),
                    graph_data: None,
                    height,
                    key,
                    summary: None,
                },
            )
        }
        QueryOutcome::Failed(e) => (
            error_status(&e),
            GraphQueryResponse {
                status: ResponseStatus::Error,
                message: format!("Error: {}", e),
                graph_data: None,
                height,
                key,
                summary: None,
            },
        ),
    };

    (status_code, Json(response))
}

/// Probe endpoint - checks that the database answers a trivial query
pub async fn probe_handler(State(state): State<AppState>) -> impl IntoResponse {
    let source = state.adapter.describe_source();
    match state.adapter.probe().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ProbeResponse {
                status: ResponseStatus::Success,
                message: format!("Connected to {}", source),
            }),
        ),
        Err(e) => {
            error!(error = %e, source = %source, "Connectivity probe failed");
            (
                error_status(&e),
                Json(ProbeResponse {
                    status: ResponseStatus::Error,
                    message: format!("Error: {}", e),
                }),
            )
        }
    }
}
