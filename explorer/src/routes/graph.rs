use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};

use super::{
    error_response,
    types::{
        CollapseResponse, EdgeResponse, ExpandPayloadRequest, ExpandResponse,
        ExpansionRequestResponse, GraphResponse, LoadRootRequest, MergeResponse, NodeResponse,
        OpenRootRequest, PositionsResponse,
    },
};
use crate::{
    AppState,
    graph::{EntityKind, GraphError, GraphSnapshot, PositionUpdate},
    session::{ExpansionOutcome, ExplorerError},
};

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

pub fn graph_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/graph", get(get_graph))
        .route("/graph/root", post(open_root))
        .route("/graph/root/payload", post(load_root))
        .route("/graph/nodes/{id}/expansion", get(expansion_request))
        .route("/graph/nodes/{id}/expand", post(expand_node))
        .route("/graph/nodes/{id}/expand/payload", post(expand_with_payload))
        .route("/graph/nodes/{id}/collapse", post(collapse_node))
        .route("/graph/nodes/{id}/select", post(select_node))
        .route("/graph/founders/{entity_id}/open", post(open_founder))
        .route("/graph/positions", put(record_positions))
}

fn graph_response(snapshot: GraphSnapshot, selected: Option<String>) -> GraphResponse {
    let edges = snapshot
        .edges
        .iter()
        .map(|edge| EdgeResponse::new(edge, selected.as_deref()))
        .collect();
    GraphResponse {
        generation: snapshot.generation,
        root_id: snapshot.root_id,
        selected_id: selected,
        nodes: snapshot.nodes.iter().map(NodeResponse::from).collect(),
        edges,
    }
}

fn expand_response(outcome: ExpansionOutcome) -> ExpandResponse {
    ExpandResponse {
        merge: outcome.report.into(),
        detail: outcome.detail,
        founders: outcome.founders.into_iter().map(Into::into).collect(),
    }
}

async fn get_graph(State(state): State<Arc<AppState>>) -> Json<GraphResponse> {
    let (snapshot, selected) = state.explorer.snapshot().await;
    Json(graph_response(snapshot, selected))
}

async fn open_root(
    State(state): State<Arc<AppState>>,
    Json(body): Json<OpenRootRequest>,
) -> ApiResult<MergeResponse> {
    let kind = body
        .kind
        .parse::<EntityKind>()
        .map_err(|err: GraphError| error_response(ExplorerError::from(err)))?;
    let report = state
        .explorer
        .open_root(kind, body.entity_id)
        .await
        .map_err(error_response)?;
    Ok(Json(report.into()))
}

async fn load_root(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoadRootRequest>,
) -> ApiResult<MergeResponse> {
    let report = state
        .explorer
        .load_root(&body.kind, body.detail)
        .await
        .map_err(error_response)?;
    Ok(Json(report.into()))
}

async fn expansion_request(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<ExpansionRequestResponse> {
    let request = state
        .explorer
        .expansion_request(&id)
        .await
        .map_err(error_response)?;
    Ok(Json(request.into()))
}

async fn expand_node(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<ExpandResponse> {
    let outcome = state.explorer.expand(&id).await.map_err(error_response)?;
    Ok(Json(expand_response(outcome)))
}

async fn expand_with_payload(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<ExpandPayloadRequest>,
) -> ApiResult<ExpandResponse> {
    let explorer = &state.explorer;
    let request = explorer.expansion_request(&id).await.map_err(error_response)?;
    let outcome = explorer
        .apply_expansion(&request, body.detail)
        .await
        .map_err(error_response)?;
    Ok(Json(expand_response(outcome)))
}

async fn collapse_node(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<CollapseResponse> {
    let report = state.explorer.collapse(&id).await.map_err(error_response)?;
    Ok(Json(report.into()))
}

async fn select_node(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    state.explorer.select(&id).await.map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn open_founder(
    State(state): State<Arc<AppState>>,
    Path(entity_id): Path<u64>,
) -> ApiResult<MergeResponse> {
    let report = state
        .explorer
        .open_founder(entity_id)
        .await
        .map_err(error_response)?;
    Ok(Json(report.into()))
}

async fn record_positions(
    State(state): State<Arc<AppState>>,
    Json(updates): Json<Vec<PositionUpdate>>,
) -> Json<PositionsResponse> {
    let applied = state.explorer.record_positions(&updates).await;
    Json(PositionsResponse { applied })
}
