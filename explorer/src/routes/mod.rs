pub mod graph;
pub mod search;

pub mod types;

use std::sync::Arc;

use axum::{Router, http::StatusCode, routing::get};

pub use graph::graph_routes;
pub use search::search_routes;

use crate::{AppState, graph::GraphError, session::ExplorerError};

/// Full router served by the binary, minus middleware.
pub fn app_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .merge(search_routes())
        .merge(graph_routes())
}

#[inline]
async fn health() -> &'static str {
    "ok"
}

pub(crate) fn error_response(err: ExplorerError) -> (StatusCode, String) {
    let status = match &err {
        ExplorerError::Graph(graph) => match graph {
            GraphError::InvalidKind(_)
            | GraphError::UnsupportedKind(_)
            | GraphError::MalformedPayload(_)
            | GraphError::MissingEntityId
            | GraphError::InvalidNodeId(_)
            | GraphError::KindMismatch { .. } => StatusCode::BAD_REQUEST,
            GraphError::UnknownNode(_) => StatusCode::NOT_FOUND,
            GraphError::StaleGeneration { .. } => StatusCode::CONFLICT,
        },
        ExplorerError::Source(_) => StatusCode::BAD_GATEWAY,
    };
    (status, err.to_string())
}
