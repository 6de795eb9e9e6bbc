use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::GraphError;

/// Type-qualified node identifier, `"<kind prefix>-<numeric entity id>"`.
pub type NodeId = String;

pub type Attributes = Map<String, Value>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EntityKind {
    #[serde(rename = "company")]
    Company,
    #[serde(rename = "pep")]
    Person,
}

impl EntityKind {
    /// Prefix used in node ids and in the data API's endpoint names.
    pub fn prefix(self) -> &'static str {
        match self {
            EntityKind::Company => "company",
            EntityKind::Person => "pep",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

impl FromStr for EntityKind {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "company" => Ok(EntityKind::Company),
            "pep" => Ok(EntityKind::Person),
            other => Err(GraphError::InvalidKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LinkCategory {
    Owner,
    Beneficiary,
    Head,
    Family,
    Business,
    Personal,
    Unknown,
}

impl LinkCategory {
    pub const ALL: [LinkCategory; 7] = [
        LinkCategory::Owner,
        LinkCategory::Beneficiary,
        LinkCategory::Head,
        LinkCategory::Business,
        LinkCategory::Family,
        LinkCategory::Personal,
        LinkCategory::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LinkCategory::Owner => "owner",
            LinkCategory::Beneficiary => "beneficiary",
            LinkCategory::Head => "head",
            LinkCategory::Family => "family",
            LinkCategory::Business => "business",
            LinkCategory::Personal => "personal",
            LinkCategory::Unknown => "unknown",
        }
    }

    /// Legend caption shown next to the link colour.
    pub fn legend_label(self) -> &'static str {
        match self {
            LinkCategory::Owner => "Власник",
            LinkCategory::Beneficiary => "Бенефіціар",
            LinkCategory::Head => "Керівник",
            LinkCategory::Business => "Ділові зв'язки",
            LinkCategory::Family => "Сімейні зв'язки",
            LinkCategory::Personal => "Особисті зв'язки",
            LinkCategory::Unknown => "Невідомо",
        }
    }
}

impl fmt::Display for LinkCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload list an extracted relation came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RelationSource {
    FounderOf,
    RelationshipsWithPeps,
    RelatedCompanies,
    FromPersonLinks,
    CheckCompanies,
}

impl RelationSource {
    pub fn field(self) -> &'static str {
        match self {
            RelationSource::FounderOf => "founder_of",
            RelationSource::RelationshipsWithPeps => "relationships_with_peps",
            RelationSource::RelatedCompanies => "related_companies",
            RelationSource::FromPersonLinks => "from_person_links",
            RelationSource::CheckCompanies => "check_companies",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub kind: EntityKind,
    pub entity_id: u64,
    pub is_root: bool,
    pub is_opened: bool,
    pub parent_id: Option<NodeId>,
    pub link_count: usize,
    pub position: Option<Position>,
    pub attributes: Attributes,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Edge {
    pub id: String,
    pub source: NodeId,
    pub target: NodeId,
    pub relation_label: Option<String>,
    pub link_category: LinkCategory,
    pub source_list: RelationSource,
    pub discovered_from: NodeId,
    pub attributes: Attributes,
}

impl Edge {
    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(&self.source, &self.target)
    }
}

/// Unordered endpoint pair; two edges with the same key are duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey(NodeId, NodeId);

impl EdgeKey {
    pub fn new(a: &str, b: &str) -> Self {
        if a <= b {
            EdgeKey(a.to_string(), b.to_string())
        } else {
            EdgeKey(b.to_string(), a.to_string())
        }
    }
}
