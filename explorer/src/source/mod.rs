use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::graph::{EntityKind, NodeId};

pub mod http;

pub use http::{HttpDetailSource, HttpSourceConfig};

/// What the analyst typed into the search box, routed to the right endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    /// Eight-digit registration code.
    CompanyCode(String),
    PersonName(String),
}

impl SearchQuery {
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.len() == 8 && input.bytes().all(|b| b.is_ascii_digit()) {
            SearchQuery::CompanyCode(input.to_string())
        } else {
            SearchQuery::PersonName(input.to_string())
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            SearchQuery::CompanyCode(_) => EntityKind::Company,
            SearchQuery::PersonName(_) => EntityKind::Person,
        }
    }

    /// Query-string pair understood by the list endpoint.
    pub fn param(&self) -> (&'static str, &str) {
        match self {
            SearchQuery::CompanyCode(code) => ("edrpou", code),
            SearchQuery::PersonName(name) => ("name_search", name),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    pub kind: EntityKind,
    pub entity_id: u64,
    pub node_id: NodeId,
    pub label: String,
}

/// API path of an entity's detail record, e.g. `/api/pep/42/`.
pub fn detail_path(kind: EntityKind, entity_id: u64) -> String {
    format!("/api/{}/{}/", kind.prefix(), entity_id)
}

/// External data API holding company and person records.
#[async_trait]
pub trait DetailSource: Send + Sync {
    async fn fetch_detail(&self, kind: EntityKind, entity_id: u64) -> Result<Value>;

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>>;
}
