use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::{
    graph::{
        CollapseReport, EntityKind, Extraction, FounderEntry, GraphError, GraphSnapshot,
        GraphStore, MergeReport, NodeId, PositionUpdate, collapse, extract, extract_tagged,
        founder_entries, merge_expansion, merge_founder, merge_root, parse_node_id, resolve_id,
    },
    source::{DetailSource, SearchHit, SearchQuery, detail_path},
};

#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("data source request failed: {0:#}")]
    Source(anyhow::Error),
}

pub type ExplorerResult<T> = Result<T, ExplorerError>;

/// Description of the fetch a click on a node triggers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpansionRequest {
    pub node_id: NodeId,
    pub kind: EntityKind,
    pub entity_id: u64,
    pub path: String,
    /// False when the node is already opened: the detail is fetched for the
    /// side panel only and nothing is merged.
    pub merge: bool,
    pub generation: u64,
}

#[derive(Debug, Clone)]
pub struct ExpansionOutcome {
    pub report: MergeReport,
    /// Raw detail payload for the side panel.
    pub detail: Value,
    pub founders: Vec<FounderEntry>,
}

#[derive(Debug, Default)]
struct Session {
    store: GraphStore,
    selected: Option<NodeId>,
}

/// A single exploration session: one graph, one selection.
///
/// Every mutation runs under the session lock; the lock is released while the
/// data source is being queried.
pub struct Explorer {
    session: Mutex<Session>,
    source: Arc<dyn DetailSource>,
}

impl Explorer {
    pub fn new(source: Arc<dyn DetailSource>) -> Self {
        Self {
            session: Mutex::new(Session::default()),
            source,
        }
    }

    pub async fn search(&self, input: &str) -> ExplorerResult<Vec<SearchHit>> {
        let query = SearchQuery::parse(input);
        self.source
            .search(&query)
            .await
            .map_err(ExplorerError::Source)
    }

    pub async fn snapshot(&self) -> (GraphSnapshot, Option<NodeId>) {
        let session = self.session.lock().await;
        (session.store.snapshot(), session.selected.clone())
    }

    /// Starts a new exploration from a search hit, discarding the old graph.
    pub async fn open_root(
        &self,
        kind: EntityKind,
        entity_id: u64,
    ) -> ExplorerResult<MergeReport> {
        let detail = self.fetch(kind, entity_id).await?;
        let extraction = extract(detail, kind)?;
        self.install_root(extraction).await
    }

    /// Same as [`Explorer::open_root`] with a payload the caller already has.
    pub async fn load_root(&self, kind: &str, detail: Value) -> ExplorerResult<MergeReport> {
        let extraction = extract_tagged(kind, detail)?;
        self.install_root(extraction).await
    }

    async fn install_root(&self, extraction: Extraction) -> ExplorerResult<MergeReport> {
        let mut session = self.session.lock().await;
        let report = merge_root(&mut session.store, extraction)?;
        session.selected = session.store.root_id().map(str::to_string);
        Ok(report)
    }

    /// What clicking `node_id` will fetch, and whether it will merge.
    pub async fn expansion_request(&self, node_id: &str) -> ExplorerResult<ExpansionRequest> {
        let session = self.session.lock().await;
        Ok(Self::request_for(&session.store, node_id)?)
    }

    fn request_for(store: &GraphStore, node_id: &str) -> Result<ExpansionRequest, GraphError> {
        let node = store
            .node(node_id)
            .ok_or_else(|| GraphError::UnknownNode(node_id.to_string()))?;
        let (kind, entity_id) = parse_node_id(&node.id)?;
        Ok(ExpansionRequest {
            node_id: node.id.clone(),
            kind,
            entity_id,
            path: detail_path(kind, entity_id),
            merge: !node.is_opened,
            generation: store.generation(),
        })
    }

    /// Handles a click: fetches the node's detail, merges its relations the
    /// first time and selects it. A failed fetch leaves the selection alone.
    pub async fn expand(&self, node_id: &str) -> ExplorerResult<ExpansionOutcome> {
        let request = {
            let session = self.session.lock().await;
            Self::request_for(&session.store, node_id)?
        };

        let detail = self.fetch(request.kind, request.entity_id).await?;
        self.apply_expansion(&request, detail).await
    }

    /// Merges a detail payload fetched for `request` and selects its node.
    pub async fn apply_expansion(
        &self,
        request: &ExpansionRequest,
        detail: Value,
    ) -> ExplorerResult<ExpansionOutcome> {
        let extraction = extract(detail.clone(), request.kind)?;

        let mut session = self.session.lock().await;
        let current = session.store.generation();
        if current != request.generation {
            warn!(
                node = %request.node_id,
                requested = request.generation,
                current,
                "discarding expansion for a replaced graph"
            );
            return Err(GraphError::StaleGeneration {
                requested: request.generation,
                current,
            }
            .into());
        }

        let report = merge_expansion(&mut session.store, &request.node_id, extraction)?;
        session.selected = Some(request.node_id.clone());
        let founders = match (&detail, request.kind) {
            (Value::Object(attributes), EntityKind::Company) => {
                founder_entries(&session.store, &request.node_id, attributes)
            }
            _ => Vec::new(),
        };

        Ok(ExpansionOutcome {
            report,
            detail,
            founders,
        })
    }

    pub async fn collapse(&self, node_id: &str) -> ExplorerResult<CollapseReport> {
        let mut session = self.session.lock().await;
        let report = collapse(&mut session.store, node_id)?;
        if session
            .selected
            .as_ref()
            .is_some_and(|selected| !session.store.contains_node(selected))
        {
            session.selected = session.store.root_id().map(str::to_string);
        }
        Ok(report)
    }

    pub async fn select(&self, node_id: &str) -> ExplorerResult<()> {
        let mut session = self.session.lock().await;
        if !session.store.contains_node(node_id) {
            return Err(GraphError::UnknownNode(node_id.to_string()).into());
        }
        session.selected = Some(node_id.to_string());
        Ok(())
    }

    /// Brings a founder company listed in the selected company's detail into
    /// the graph.
    pub async fn open_founder(&self, company_entity_id: u64) -> ExplorerResult<MergeReport> {
        let (selected, generation) = {
            let session = self.session.lock().await;
            let selected = session
                .selected
                .clone()
                .ok_or_else(|| GraphError::UnknownNode(String::from("<no selection>")))?;
            (selected, session.store.generation())
        };

        let detail = self.fetch(EntityKind::Company, company_entity_id).await?;
        let extraction = extract(detail, EntityKind::Company)?;

        let mut session = self.session.lock().await;
        let current = session.store.generation();
        if current != generation {
            return Err(GraphError::StaleGeneration {
                requested: generation,
                current,
            }
            .into());
        }
        let report = merge_founder(&mut session.store, &selected, extraction)?;
        session.selected = Some(resolve_id(EntityKind::Company, company_entity_id));
        Ok(report)
    }

    pub async fn record_positions(&self, updates: &[PositionUpdate]) -> usize {
        let mut session = self.session.lock().await;
        session.store.apply_positions(updates)
    }

    async fn fetch(&self, kind: EntityKind, entity_id: u64) -> ExplorerResult<Value> {
        info!(%kind, entity_id, "requesting entity detail");
        self.source
            .fetch_detail(kind, entity_id)
            .await
            .map_err(ExplorerError::Source)
    }
}
