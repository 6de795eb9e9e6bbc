use serde_json::Value;
use tracing::warn;

use super::{
    classifier::classify,
    error::{GraphError, GraphResult},
    types::{Attributes, EntityKind, LinkCategory, RelationSource},
};

/// How a related entity is attached to the entity whose payload listed it.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationDescriptor {
    pub label: Option<String>,
    pub category: LinkCategory,
    pub source_list: RelationSource,
    /// Remaining fields of the link wrapper, minus the embedded entity.
    pub attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelatedItem {
    pub kind: EntityKind,
    pub attributes: Attributes,
    pub relation: RelationDescriptor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub kind: EntityKind,
    /// Entity attributes with the relation lists stripped out.
    pub attributes: Attributes,
    pub related: Vec<RelatedItem>,
    pub dropped: usize,
}

/// Relation list layout inside a detail payload.
enum ListShape {
    /// Plain list of entities, attached with a fixed category.
    Entities(LinkCategory),
    /// List of wrappers holding the entity under `entity_field` and the raw
    /// relationship label under `label_field`.
    Wrapped {
        entity_field: &'static str,
        label_field: &'static str,
    },
}

struct RelationList {
    source: RelationSource,
    kind: EntityKind,
    shape: ListShape,
}

fn relation_lists(kind: EntityKind) -> [Option<RelationList>; 3] {
    match kind {
        EntityKind::Company => [
            Some(RelationList {
                source: RelationSource::FounderOf,
                kind: EntityKind::Company,
                shape: ListShape::Entities(LinkCategory::Owner),
            }),
            Some(RelationList {
                source: RelationSource::RelationshipsWithPeps,
                kind: EntityKind::Person,
                shape: ListShape::Wrapped {
                    entity_field: "pep",
                    label_field: "relationship_type",
                },
            }),
            None,
        ],
        EntityKind::Person => [
            Some(RelationList {
                source: RelationSource::RelatedCompanies,
                kind: EntityKind::Company,
                shape: ListShape::Wrapped {
                    entity_field: "company",
                    label_field: "relationship_type",
                },
            }),
            Some(RelationList {
                source: RelationSource::FromPersonLinks,
                kind: EntityKind::Person,
                shape: ListShape::Wrapped {
                    entity_field: "to_person",
                    label_field: "to_person_relationship_type",
                },
            }),
            // Possible links still under review are drawn as ownership.
            Some(RelationList {
                source: RelationSource::CheckCompanies,
                kind: EntityKind::Company,
                shape: ListShape::Entities(LinkCategory::Owner),
            }),
        ],
    }
}

pub fn extract(payload: Value, kind: EntityKind) -> GraphResult<Extraction> {
    let mut attributes = match payload {
        Value::Object(map) => map,
        other => {
            return Err(GraphError::MalformedPayload(format!(
                "expected an object for {kind} detail, got {}",
                json_type(&other)
            )));
        }
    };

    let mut related = Vec::new();
    let mut dropped = 0usize;

    for list in relation_lists(kind).into_iter().flatten() {
        let entries = match attributes.remove(list.source.field()) {
            Some(Value::Array(entries)) => entries,
            Some(Value::Null) | None => Vec::new(),
            Some(other) => {
                warn!(
                    field = list.source.field(),
                    found = json_type(&other),
                    "relation list is not an array, ignoring"
                );
                dropped += 1;
                continue;
            }
        };

        for entry in entries {
            match decompose(&list, entry) {
                Some(item) => related.push(item),
                None => {
                    warn!(field = list.source.field(), "dropping malformed relation entry");
                    dropped += 1;
                }
            }
        }
    }

    Ok(Extraction {
        kind,
        attributes,
        related,
        dropped,
    })
}

/// Extraction entry point for kinds that arrive as text.
pub fn extract_tagged(kind: &str, payload: Value) -> GraphResult<Extraction> {
    let kind = kind
        .parse::<EntityKind>()
        .map_err(|_| GraphError::UnsupportedKind(kind.to_string()))?;
    extract(payload, kind)
}

fn decompose(list: &RelationList, entry: Value) -> Option<RelatedItem> {
    let Value::Object(mut wrapper) = entry else {
        return None;
    };

    let (attributes, relation) = match list.shape {
        ListShape::Entities(category) => (
            wrapper,
            RelationDescriptor {
                label: None,
                category,
                source_list: list.source,
                attributes: Attributes::new(),
            },
        ),
        ListShape::Wrapped {
            entity_field,
            label_field,
        } => {
            let Some(Value::Object(entity)) = wrapper.remove(entity_field) else {
                return None;
            };
            let label = wrapper
                .get(label_field)
                .and_then(Value::as_str)
                .map(str::to_string);
            let category = label
                .as_deref()
                .map(classify)
                .unwrap_or(LinkCategory::Unknown);
            (
                entity,
                RelationDescriptor {
                    label,
                    category,
                    source_list: list.source,
                    attributes: wrapper,
                },
            )
        }
    };

    Some(RelatedItem {
        kind: list.kind,
        attributes,
        relation,
    })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
