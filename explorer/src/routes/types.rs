use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::{
    graph::{
        CollapseReport, Edge, FounderEntry, MergeReport, Node, child_count_badge,
        display_category,
    },
    session::ExpansionRequest,
    source::SearchHit,
};

#[derive(Clone, Debug, Deserialize, TS, Serialize)]
#[ts(export)]
pub struct NodeResponse {
    pub id: String,
    pub kind: String,
    pub entity_id: u64,
    pub is_root: bool,
    pub is_opened: bool,
    pub parent_id: Option<String>,
    pub link_count: usize,
    pub child_count: Option<u64>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    #[ts(type = "Record<string, unknown>")]
    pub attributes: Value,
}

impl From<&Node> for NodeResponse {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.clone(),
            kind: node.kind.to_string(),
            entity_id: node.entity_id,
            is_root: node.is_root,
            is_opened: node.is_opened,
            parent_id: node.parent_id.clone(),
            link_count: node.link_count,
            child_count: child_count_badge(node),
            x: node.position.map(|p| p.x),
            y: node.position.map(|p| p.y),
            attributes: Value::Object(node.attributes.clone()),
        }
    }
}

#[derive(Clone, Debug, Deserialize, TS, Serialize)]
#[ts(export)]
pub struct EdgeResponse {
    pub id: String,
    pub source: String,
    pub target: String,
    pub relation_label: Option<String>,
    pub link_category: String,
    /// `link_category`, or `inactive` when the edge does not leave the
    /// selected node.
    pub display_category: String,
    pub source_list: String,
    pub discovered_from: String,
}

impl EdgeResponse {
    pub fn new(edge: &Edge, selected: Option<&str>) -> Self {
        Self {
            id: edge.id.clone(),
            source: edge.source.clone(),
            target: edge.target.clone(),
            relation_label: edge.relation_label.clone(),
            link_category: edge.link_category.to_string(),
            display_category: display_category(edge, selected).to_string(),
            source_list: edge.source_list.field().to_string(),
            discovered_from: edge.discovered_from.clone(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, TS, Serialize)]
#[ts(export)]
pub struct GraphResponse {
    pub generation: u64,
    pub root_id: Option<String>,
    pub selected_id: Option<String>,
    pub nodes: Vec<NodeResponse>,
    pub edges: Vec<EdgeResponse>,
}

#[derive(Clone, Debug, Default, Deserialize, TS, Serialize)]
#[ts(export)]
pub struct MergeResponse {
    pub nodes_added: Vec<String>,
    pub edges_added: Vec<String>,
    pub duplicates: usize,
    pub self_loops: usize,
    pub failed: usize,
    pub already_opened: bool,
}

impl From<MergeReport> for MergeResponse {
    fn from(report: MergeReport) -> Self {
        Self {
            nodes_added: report.nodes_added,
            edges_added: report.edges_added,
            duplicates: report.duplicates,
            self_loops: report.self_loops,
            failed: report.failed,
            already_opened: report.already_opened,
        }
    }
}

#[derive(Clone, Debug, Deserialize, TS, Serialize)]
#[ts(export)]
pub struct FounderResponse {
    pub name: String,
    pub edrpou: Option<String>,
    pub company_node_id: Option<String>,
    pub openable: bool,
}

impl From<FounderEntry> for FounderResponse {
    fn from(entry: FounderEntry) -> Self {
        Self {
            name: entry.name,
            edrpou: entry.edrpou,
            company_node_id: entry.company_node_id,
            openable: entry.openable,
        }
    }
}

#[derive(Clone, Debug, Deserialize, TS, Serialize)]
#[ts(export)]
pub struct ExpandResponse {
    pub merge: MergeResponse,
    #[ts(type = "Record<string, unknown>")]
    pub detail: Value,
    pub founders: Vec<FounderResponse>,
}

#[derive(Clone, Debug, Deserialize, TS, Serialize)]
#[ts(export)]
pub struct CollapseResponse {
    pub removed_nodes: Vec<String>,
    pub removed_edges: Vec<String>,
    pub reopenable: Vec<String>,
}

impl From<CollapseReport> for CollapseResponse {
    fn from(report: CollapseReport) -> Self {
        Self {
            removed_nodes: report.removed_nodes,
            removed_edges: report.removed_edges,
            reopenable: report.reopenable,
        }
    }
}

#[derive(Clone, Debug, Deserialize, TS, Serialize)]
#[ts(export)]
pub struct ExpansionRequestResponse {
    pub node_id: String,
    pub kind: String,
    pub entity_id: u64,
    pub path: String,
    pub merge: bool,
    pub generation: u64,
}

impl From<ExpansionRequest> for ExpansionRequestResponse {
    fn from(request: ExpansionRequest) -> Self {
        Self {
            node_id: request.node_id,
            kind: request.kind.to_string(),
            entity_id: request.entity_id,
            path: request.path,
            merge: request.merge,
            generation: request.generation,
        }
    }
}

#[derive(Clone, Debug, Deserialize, TS, Serialize)]
#[ts(export)]
pub struct SearchHitResponse {
    pub kind: String,
    pub entity_id: u64,
    pub node_id: String,
    pub label: String,
}

impl From<SearchHit> for SearchHitResponse {
    fn from(hit: SearchHit) -> Self {
        Self {
            kind: hit.kind.to_string(),
            entity_id: hit.entity_id,
            node_id: hit.node_id,
            label: hit.label,
        }
    }
}

#[derive(Clone, Debug, Deserialize, TS, Serialize)]
#[ts(export)]
pub struct SearchResponse {
    pub results: Vec<SearchHitResponse>,
}

#[derive(Clone, Debug, Deserialize, TS, Serialize)]
#[ts(export)]
pub struct OpenRootRequest {
    pub kind: String,
    pub entity_id: u64,
}

#[derive(Clone, Debug, Deserialize, TS, Serialize)]
#[ts(export)]
pub struct LoadRootRequest {
    pub kind: String,
    #[ts(type = "Record<string, unknown>")]
    pub detail: Value,
}

#[derive(Clone, Debug, Deserialize, TS, Serialize)]
#[ts(export)]
pub struct PositionsResponse {
    pub applied: usize,
}

#[derive(Clone, Debug, Deserialize, TS, Serialize)]
#[ts(export)]
pub struct ExpandPayloadRequest {
    #[ts(type = "Record<string, unknown>")]
    pub detail: Value,
}
