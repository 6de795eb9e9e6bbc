use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;

use super::{error_response, types::SearchResponse};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
}

pub fn search_routes() -> Router<Arc<AppState>> {
    Router::new().route("/search", get(search))
}

async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    if params.q.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "empty search query".to_string()));
    }
    let hits = state
        .explorer
        .search(&params.q)
        .await
        .map_err(error_response)?;
    Ok(Json(SearchResponse {
        results: hits.into_iter().map(Into::into).collect(),
    }))
}
