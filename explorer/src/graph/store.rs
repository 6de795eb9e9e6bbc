use std::collections::{HashMap, HashSet};

use petgraph::{
    Direction,
    stable_graph::{EdgeIndex, NodeIndex, StableDiGraph},
};
use serde::{Deserialize, Serialize};

use super::types::{Edge, EdgeKey, Node, NodeId, Position};

/// Position reported back by the renderer for one node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PositionUpdate {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
}

/// Read-only copy of the store handed to the renderer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphSnapshot {
    pub generation: u64,
    pub root_id: Option<NodeId>,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// The nodes and edges of the network currently on screen.
///
/// Nodes are keyed by their type-qualified id and edges by their unordered
/// endpoint pair, so both dedup checks are map lookups. Only the merge and
/// collapse code in this module tree can add or remove elements.
///
/// Iteration and snapshots follow insertion order; petgraph reuses freed
/// indices, so the order is kept separately.
#[derive(Debug, Default)]
pub struct GraphStore {
    graph: StableDiGraph<Node, Edge>,
    node_index: HashMap<NodeId, NodeIndex>,
    edge_index: HashMap<EdgeKey, EdgeIndex>,
    node_order: Vec<NodeId>,
    edge_order: Vec<EdgeKey>,
    root_id: Option<NodeId>,
    generation: u64,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn root_id(&self) -> Option<&str> {
        self.root_id.as_deref()
    }

    pub fn root(&self) -> Option<&Node> {
        self.root_id.as_deref().and_then(|id| self.node(id))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.node_index
            .get(id)
            .and_then(|idx| self.graph.node_weight(*idx))
    }

    pub(crate) fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        let idx = *self.node_index.get(id)?;
        self.graph.node_weight_mut(idx)
    }

    pub fn edge_between(&self, a: &str, b: &str) -> Option<&Edge> {
        self.edge_index
            .get(&EdgeKey::new(a, b))
            .and_then(|idx| self.graph.edge_weight(*idx))
    }

    pub fn contains_edge_between(&self, a: &str, b: &str) -> bool {
        self.edge_index.contains_key(&EdgeKey::new(a, b))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.node_order.iter().filter_map(|id| self.node(id))
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edge_order
            .iter()
            .filter_map(|key| self.edge_index.get(key))
            .filter_map(|idx| self.graph.edge_weight(*idx))
    }

    /// Edges where `id` is the source.
    pub fn outgoing(&self, id: &str) -> Vec<&Edge> {
        self.edges_in_direction(id, Direction::Outgoing)
    }

    /// Edges where `id` is the target.
    pub fn incoming(&self, id: &str) -> Vec<&Edge> {
        self.edges_in_direction(id, Direction::Incoming)
    }

    /// Ids of every node sharing an edge with `id`, regardless of direction.
    pub fn neighbors(&self, id: &str) -> Vec<&str> {
        let Some(idx) = self.node_index.get(id) else {
            return Vec::new();
        };
        self.graph
            .neighbors_undirected(*idx)
            .filter_map(|n| self.graph.node_weight(n))
            .map(|node| node.id.as_str())
            .collect()
    }

    fn edges_in_direction(&self, id: &str, direction: Direction) -> Vec<&Edge> {
        let Some(idx) = self.node_index.get(id) else {
            return Vec::new();
        };
        self.graph
            .edges_directed(*idx, direction)
            .map(|edge| edge.weight())
            .collect()
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            generation: self.generation,
            root_id: self.root_id.clone(),
            nodes: self.nodes().cloned().collect(),
            edges: self.edges().cloned().collect(),
        }
    }

    /// Records layout positions. Unknown ids are ignored; returns how many
    /// nodes were updated.
    pub fn apply_positions(&mut self, updates: &[PositionUpdate]) -> usize {
        let mut applied = 0;
        for update in updates {
            if let Some(node) = self.node_mut(&update.id) {
                node.position = Some(Position {
                    x: update.x,
                    y: update.y,
                });
                applied += 1;
            }
        }
        applied
    }

    /// Drops the whole graph and starts a new generation rooted at `root`.
    pub(crate) fn reset(&mut self, root: Node) {
        self.graph.clear();
        self.node_index.clear();
        self.edge_index.clear();
        self.node_order.clear();
        self.edge_order.clear();
        self.generation += 1;
        self.root_id = Some(root.id.clone());
        self.insert_node(root);
    }

    /// Returns false when a node with the same id already exists.
    pub(crate) fn insert_node(&mut self, node: Node) -> bool {
        if self.node_index.contains_key(&node.id) {
            return false;
        }
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.node_index.insert(id.clone(), idx);
        self.node_order.push(id);
        true
    }

    /// Returns false for self-loops, missing endpoints and pairs that are
    /// already linked in either direction.
    pub(crate) fn insert_edge(&mut self, edge: Edge) -> bool {
        if edge.source == edge.target {
            return false;
        }
        let key = edge.key();
        if self.edge_index.contains_key(&key) {
            return false;
        }
        let (Some(source), Some(target)) = (
            self.node_index.get(&edge.source).copied(),
            self.node_index.get(&edge.target).copied(),
        ) else {
            return false;
        };
        let idx = self.graph.add_edge(source, target, edge);
        self.edge_index.insert(key.clone(), idx);
        self.edge_order.push(key);
        true
    }

    /// Removes every listed edge and node in one pass.
    pub(crate) fn remove(&mut self, nodes: &HashSet<NodeId>, edges: &HashSet<EdgeKey>) {
        for key in edges {
            if let Some(idx) = self.edge_index.remove(key) {
                self.graph.remove_edge(idx);
            }
        }
        for id in nodes {
            if let Some(idx) = self.node_index.remove(id) {
                // petgraph drops any incident edge along with the node
                let dangling: Vec<EdgeKey> = self
                    .graph
                    .edges_directed(idx, Direction::Outgoing)
                    .chain(self.graph.edges_directed(idx, Direction::Incoming))
                    .map(|edge| edge.weight().key())
                    .collect();
                for key in dangling {
                    self.edge_index.remove(&key);
                }
                self.graph.remove_node(idx);
            }
        }
        self.node_order.retain(|id| self.node_index.contains_key(id));
        self.edge_order.retain(|key| self.edge_index.contains_key(key));
        if self
            .root_id
            .as_ref()
            .is_some_and(|root| !self.node_index.contains_key(root))
        {
            self.root_id = None;
        }
    }

    /// Full recount of edges touching each node.
    pub(crate) fn recount_links(&mut self) {
        let indices: Vec<NodeIndex> = self.graph.node_indices().collect();
        for idx in indices {
            let count = self.graph.edges_directed(idx, Direction::Outgoing).count()
                + self.graph.edges_directed(idx, Direction::Incoming).count();
            if let Some(node) = self.graph.node_weight_mut(idx) {
                node.link_count = count;
            }
        }
    }
}
