use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{
    error::{GraphError, GraphResult},
    extractor::{Extraction, RelatedItem},
    identity::{entity_id, resolve_id},
    store::GraphStore,
    types::{Edge, EntityKind, Node, NodeId, Position, RelationSource},
};

/// What a single merge call changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MergeReport {
    pub nodes_added: Vec<NodeId>,
    pub edges_added: Vec<String>,
    pub duplicates: usize,
    pub self_loops: usize,
    pub failed: usize,
    /// The parent had already been expanded; nothing was merged.
    pub already_opened: bool,
}

impl MergeReport {
    pub fn is_noop(&self) -> bool {
        self.nodes_added.is_empty() && self.edges_added.is_empty()
    }
}

/// Replaces the store with the entity in `extraction` as root and everything
/// its payload relates to.
pub fn merge_root(store: &mut GraphStore, extraction: Extraction) -> GraphResult<MergeReport> {
    let Extraction {
        kind,
        attributes,
        related,
        dropped,
    } = extraction;
    let root_entity_id = entity_id(&attributes)?;
    let root_id = resolve_id(kind, root_entity_id);

    store.reset(Node {
        id: root_id.clone(),
        kind,
        entity_id: root_entity_id,
        is_root: true,
        is_opened: true,
        parent_id: None,
        link_count: 0,
        position: None,
        attributes,
    });

    let mut report = MergeReport {
        failed: dropped,
        ..MergeReport::default()
    };
    for item in related {
        splice(store, &root_id, None, item, &mut report);
    }
    store.recount_links();

    info!(
        root = %root_id,
        generation = store.generation(),
        nodes = store.node_count(),
        edges = store.edge_count(),
        failed = report.failed,
        "graph rooted"
    );
    Ok(report)
}

/// Splices the relations of an already present node into the store.
pub fn merge_expansion(
    store: &mut GraphStore,
    parent_id: &str,
    extraction: Extraction,
) -> GraphResult<MergeReport> {
    let parent = store
        .node(parent_id)
        .ok_or_else(|| GraphError::UnknownNode(parent_id.to_string()))?;
    ensure_kind(parent, extraction.kind)?;

    if parent.is_opened {
        debug!(node = %parent_id, "node already opened, skipping merge");
        return Ok(MergeReport {
            already_opened: true,
            ..MergeReport::default()
        });
    }

    let origin = parent.position;
    let mut report = MergeReport {
        failed: extraction.dropped,
        ..MergeReport::default()
    };
    for item in extraction.related {
        splice(store, parent_id, origin, item, &mut report);
    }

    if let Some(parent) = store.node_mut(parent_id) {
        parent.is_opened = true;
    }
    store.recount_links();

    info!(
        node = %parent_id,
        added_nodes = report.nodes_added.len(),
        added_edges = report.edges_added.len(),
        duplicates = report.duplicates,
        failed = report.failed,
        "node expanded"
    );
    Ok(report)
}

/// Brings a founder company into the graph from the selected node's detail
/// view, together with the companies it founded.
///
/// The founder is created already opened next to the selected node; only its
/// `founder_of` relations are spliced, with the founder as the discovering
/// side. An existing founder node keeps its attributes and opened state.
pub fn merge_founder(
    store: &mut GraphStore,
    selected_id: &str,
    extraction: Extraction,
) -> GraphResult<MergeReport> {
    let selected = store
        .node(selected_id)
        .ok_or_else(|| GraphError::UnknownNode(selected_id.to_string()))?;
    if extraction.kind != EntityKind::Company {
        return Err(GraphError::KindMismatch {
            node_id: selected_id.to_string(),
            expected: EntityKind::Company.to_string(),
            actual: extraction.kind.to_string(),
        });
    }
    let origin = selected.position;

    let Extraction {
        kind,
        attributes,
        related,
        dropped,
    } = extraction;
    let founder_entity_id = entity_id(&attributes)?;
    let founder_id = resolve_id(kind, founder_entity_id);

    let mut report = MergeReport {
        failed: dropped,
        ..MergeReport::default()
    };

    let created = founder_id != selected_id
        && store.insert_node(Node {
            id: founder_id.clone(),
            kind,
            entity_id: founder_entity_id,
            is_root: false,
            is_opened: true,
            parent_id: Some(selected_id.to_string()),
            link_count: 0,
            position: origin,
            attributes,
        });
    if created {
        report.nodes_added.push(founder_id.clone());
    }

    let founder_origin = store.node(&founder_id).and_then(|node| node.position);
    for item in related
        .into_iter()
        .filter(|item| item.relation.source_list == RelationSource::FounderOf)
    {
        splice(store, &founder_id, founder_origin, item, &mut report);
    }
    store.recount_links();

    info!(
        founder = %founder_id,
        selected = %selected_id,
        added_nodes = report.nodes_added.len(),
        added_edges = report.edges_added.len(),
        "founder company opened"
    );
    Ok(report)
}

fn ensure_kind(node: &Node, kind: EntityKind) -> GraphResult<()> {
    if node.kind == kind {
        return Ok(());
    }
    Err(GraphError::KindMismatch {
        node_id: node.id.clone(),
        expected: node.kind.to_string(),
        actual: kind.to_string(),
    })
}

/// Inserts one related entity and its link to `parent_id`, skipping whatever
/// the store already has.
fn splice(
    store: &mut GraphStore,
    parent_id: &str,
    origin: Option<Position>,
    item: RelatedItem,
    report: &mut MergeReport,
) {
    let RelatedItem {
        kind,
        attributes,
        relation,
    } = item;

    let child_entity_id = match entity_id(&attributes) {
        Ok(id) => id,
        Err(err) => {
            warn!(
                parent = %parent_id,
                list = relation.source_list.field(),
                error = %err,
                "skipping related entity"
            );
            report.failed += 1;
            return;
        }
    };
    let child_id = resolve_id(kind, child_entity_id);

    if child_id == parent_id {
        report.self_loops += 1;
        return;
    }

    if store.contains_node(&child_id) {
        if store.contains_edge_between(parent_id, &child_id) {
            report.duplicates += 1;
            return;
        }
    } else {
        store.insert_node(Node {
            id: child_id.clone(),
            kind,
            entity_id: child_entity_id,
            is_root: false,
            is_opened: false,
            parent_id: Some(parent_id.to_string()),
            link_count: 0,
            position: origin,
            attributes,
        });
        report.nodes_added.push(child_id.clone());
    }

    let edge = Edge {
        id: format!("{parent_id}-{child_id}"),
        source: parent_id.to_string(),
        target: child_id,
        relation_label: relation.label,
        link_category: relation.category,
        source_list: relation.source_list,
        discovered_from: parent_id.to_string(),
        attributes: relation.attributes,
    };
    let edge_id = edge.id.clone();
    if store.insert_edge(edge) {
        report.edges_added.push(edge_id);
    } else {
        report.duplicates += 1;
    }
}
