use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    identity::resolve_id,
    store::GraphStore,
    types::{Attributes, Edge, EntityKind, LinkCategory, Node, NodeId},
};

/// Category an edge is drawn with. `Inactive` depends on the selection and is
/// never stored on the edge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DisplayCategory {
    Owner,
    Beneficiary,
    Head,
    Family,
    Business,
    Personal,
    Unknown,
    Inactive,
}

impl From<LinkCategory> for DisplayCategory {
    fn from(category: LinkCategory) -> Self {
        match category {
            LinkCategory::Owner => DisplayCategory::Owner,
            LinkCategory::Beneficiary => DisplayCategory::Beneficiary,
            LinkCategory::Head => DisplayCategory::Head,
            LinkCategory::Family => DisplayCategory::Family,
            LinkCategory::Business => DisplayCategory::Business,
            LinkCategory::Personal => DisplayCategory::Personal,
            LinkCategory::Unknown => DisplayCategory::Unknown,
        }
    }
}

impl fmt::Display for DisplayCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DisplayCategory::Inactive => "inactive",
            DisplayCategory::Owner => LinkCategory::Owner.as_str(),
            DisplayCategory::Beneficiary => LinkCategory::Beneficiary.as_str(),
            DisplayCategory::Head => LinkCategory::Head.as_str(),
            DisplayCategory::Family => LinkCategory::Family.as_str(),
            DisplayCategory::Business => LinkCategory::Business.as_str(),
            DisplayCategory::Personal => LinkCategory::Personal.as_str(),
            DisplayCategory::Unknown => LinkCategory::Unknown.as_str(),
        };
        f.write_str(name)
    }
}

/// Edges leaving the selected node keep their colour, the rest are greyed out.
pub fn display_category(edge: &Edge, selected: Option<&str>) -> DisplayCategory {
    match selected {
        Some(selected) if edge.source == selected => edge.link_category.into(),
        _ => DisplayCategory::Inactive,
    }
}

fn text<'a>(attributes: &'a Attributes, key: &str) -> Option<&'a str> {
    attributes.get(key).and_then(Value::as_str)
}

/// One-line caption used in search results and node titles.
pub fn entity_label(kind: EntityKind, attributes: &Attributes) -> String {
    match kind {
        EntityKind::Person => text(attributes, "fullname").unwrap_or_default().to_string(),
        EntityKind::Company => {
            let edrpou = text(attributes, "edrpou").unwrap_or_default();
            let name = text(attributes, "name").unwrap_or_default();
            format!("{edrpou} - {name}")
        }
    }
}

/// Number of founded companies to badge on a node that has not been opened.
pub fn child_count_badge(node: &Node) -> Option<u64> {
    if node.is_opened {
        return None;
    }
    node.attributes
        .get("founder_of_count")
        .and_then(Value::as_u64)
        .filter(|count| *count > 0)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FounderEntry {
    pub name: String,
    pub edrpou: Option<String>,
    /// Node id of the founder when it is a registered company.
    pub company_node_id: Option<NodeId>,
    /// True when the founder company can still be brought into the graph.
    pub openable: bool,
}

/// Founders listed on a company's detail payload, flagged as openable when the
/// founder is a company whose ownership link is not on screen yet.
pub fn founder_entries(
    store: &GraphStore,
    company_id: &str,
    detail: &Attributes,
) -> Vec<FounderEntry> {
    let Some(Value::Array(founders)) = detail.get("founders") else {
        return Vec::new();
    };

    founders
        .iter()
        .filter_map(Value::as_object)
        .map(|founder| {
            let company_node_id = founder
                .get("id_if_company")
                .and_then(Value::as_u64)
                .map(|id| resolve_id(EntityKind::Company, id));
            let linked = company_node_id.as_deref().is_some_and(|founder_id| {
                store
                    .edge_between(founder_id, company_id)
                    .is_some_and(|edge| edge.source == founder_id)
            });
            FounderEntry {
                name: text(founder, "name").unwrap_or_default().to_string(),
                edrpou: text(founder, "edrpou").map(str::to_string),
                openable: company_node_id.is_some() && !linked,
                company_node_id,
            }
        })
        .collect()
}
