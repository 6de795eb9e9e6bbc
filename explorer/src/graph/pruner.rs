use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{
    error::{GraphError, GraphResult},
    store::GraphStore,
    types::{EdgeKey, NodeId},
};

/// Nodes and edges a collapse will remove, decided before anything changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollapsePlan {
    pub nodes: HashSet<NodeId>,
    pub edges: HashSet<EdgeKey>,
    /// Edge ids matching `edges`, for reporting.
    pub edge_ids: Vec<String>,
}

impl CollapsePlan {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CollapseReport {
    pub removed_nodes: Vec<NodeId>,
    pub removed_edges: Vec<String>,
    /// Surviving non-root nodes that discovered a removed node and can be
    /// expanded again.
    pub reopenable: Vec<NodeId>,
}

/// Decides what collapsing `node_id` removes without touching the store.
///
/// Only the component holding `node_id` is affected. Its anchors are the root
/// when the component contains it, otherwise the nodes with no edge to the
/// node that discovered them (a founder opened from the detail panel). The
/// plan is everything the anchors reach now but no longer reach once
/// `node_id` is gone, plus `node_id` itself. A node with another path to an
/// anchor is kept; the root is never removed.
pub fn plan_collapse(store: &GraphStore, node_id: &str) -> GraphResult<CollapsePlan> {
    let node = store
        .node(node_id)
        .ok_or_else(|| GraphError::UnknownNode(node_id.to_string()))?;
    if node.is_root {
        return Ok(CollapsePlan::default());
    }

    let component = reach(store, &[node.id.as_str()], None);
    let anchors: Vec<&str> = match store.root_id() {
        Some(root_id) if component.contains(root_id) => vec![root_id],
        _ => store
            .nodes()
            .filter(|candidate| component.contains(candidate.id.as_str()))
            .filter(|candidate| {
                candidate
                    .parent_id
                    .as_deref()
                    .is_none_or(|parent| !store.contains_edge_between(parent, &candidate.id))
            })
            .map(|candidate| candidate.id.as_str())
            .collect(),
    };

    let before = reach(store, &anchors, None);
    let remaining: Vec<&str> = anchors
        .iter()
        .copied()
        .filter(|anchor| *anchor != node_id)
        .collect();
    let after = reach(store, &remaining, Some(node_id));

    let mut nodes: HashSet<NodeId> = before
        .difference(&after)
        .map(|id| id.to_string())
        .collect();
    nodes.insert(node_id.to_string());

    let mut edges = HashSet::new();
    let mut edge_ids = Vec::new();
    for edge in store.edges() {
        if nodes.contains(&edge.source) || nodes.contains(&edge.target) {
            edges.insert(edge.key());
            edge_ids.push(edge.id.clone());
        }
    }

    Ok(CollapsePlan {
        nodes,
        edges,
        edge_ids,
    })
}

/// Nodes reachable from `starts` over edges in either direction, never
/// entering `blocked`.
fn reach<'a>(
    store: &'a GraphStore,
    starts: &[&'a str],
    blocked: Option<&str>,
) -> HashSet<&'a str> {
    let mut seen: HashSet<&str> = starts.iter().copied().collect();
    let mut stack: Vec<&str> = starts.to_vec();
    while let Some(current) = stack.pop() {
        for neighbor in store.neighbors(current) {
            if Some(neighbor) == blocked || seen.contains(neighbor) {
                continue;
            }
            seen.insert(neighbor);
            stack.push(neighbor);
        }
    }
    seen
}

/// Removes `node_id` and the branch hanging off it. A no-op for the root.
pub fn collapse(store: &mut GraphStore, node_id: &str) -> GraphResult<CollapseReport> {
    let plan = plan_collapse(store, node_id)?;
    if plan.is_empty() {
        debug!(node = %node_id, "root cannot be collapsed");
        return Ok(CollapseReport::default());
    }

    // a surviving node that discovered a removed one can fetch it again
    let mut reopenable: Vec<NodeId> = plan
        .nodes
        .iter()
        .filter_map(|id| store.node(id))
        .filter_map(|removed| removed.parent_id.clone())
        .filter(|parent| !plan.nodes.contains(parent))
        .filter(|parent| store.node(parent).is_some_and(|node| !node.is_root))
        .collect();
    reopenable.sort();
    reopenable.dedup();

    store.remove(&plan.nodes, &plan.edges);
    for id in &reopenable {
        if let Some(node) = store.node_mut(id) {
            node.is_opened = false;
        }
    }
    store.recount_links();

    let mut removed_nodes: Vec<NodeId> = plan.nodes.into_iter().collect();
    removed_nodes.sort();
    info!(
        node = %node_id,
        removed_nodes = removed_nodes.len(),
        removed_edges = plan.edge_ids.len(),
        remaining = store.node_count(),
        "node collapsed"
    );

    Ok(CollapseReport {
        removed_nodes,
        removed_edges: plan.edge_ids,
        reopenable,
    })
}
