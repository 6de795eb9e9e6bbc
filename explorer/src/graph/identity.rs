use serde_json::Value;

use super::{
    error::{GraphError, GraphResult},
    types::{Attributes, EntityKind, NodeId},
};

pub fn resolve_id(kind: EntityKind, entity_id: u64) -> NodeId {
    format!("{}-{}", kind.prefix(), entity_id)
}

/// Resolves an id for a kind that arrived as text (search hits, route params).
pub fn resolve_id_for(kind: &str, entity_id: u64) -> GraphResult<NodeId> {
    let kind: EntityKind = kind.parse()?;
    Ok(resolve_id(kind, entity_id))
}

/// Inverse of [`resolve_id`].
pub fn parse_node_id(node_id: &str) -> GraphResult<(EntityKind, u64)> {
    let invalid = || GraphError::InvalidNodeId(node_id.to_string());
    let (prefix, numeric) = node_id.rsplit_once('-').ok_or_else(invalid)?;
    let kind = prefix.parse::<EntityKind>().map_err(|_| invalid())?;
    let entity_id = numeric.parse::<u64>().map_err(|_| invalid())?;
    Ok((kind, entity_id))
}

/// Numeric id of a raw entity record. The data API sends numbers, but numeric
/// strings are accepted as well.
pub fn entity_id(attributes: &Attributes) -> GraphResult<u64> {
    match attributes.get("id") {
        Some(Value::Number(number)) => number.as_u64().ok_or(GraphError::MissingEntityId),
        Some(Value::String(text)) => text
            .trim()
            .parse::<u64>()
            .map_err(|_| GraphError::MissingEntityId),
        _ => Err(GraphError::MissingEntityId),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ids_are_stable_and_kind_qualified() {
        assert_eq!(resolve_id(EntityKind::Company, 123), "company-123");
        assert_eq!(
            resolve_id(EntityKind::Company, 123),
            resolve_id(EntityKind::Company, 123)
        );
        assert_ne!(
            resolve_id(EntityKind::Company, 123),
            resolve_id(EntityKind::Person, 123)
        );
    }

    #[test]
    fn textual_kind_outside_the_set_is_rejected() {
        assert_eq!(
            resolve_id_for("person", 1),
            Err(GraphError::InvalidKind("person".into()))
        );
        assert_eq!(resolve_id_for("pep", 1).as_deref(), Ok("pep-1"));
    }

    #[test]
    fn node_ids_round_trip_to_fetch_coordinates() {
        assert_eq!(parse_node_id("pep-42"), Ok((EntityKind::Person, 42)));
        assert!(parse_node_id("pep-").is_err());
        assert!(parse_node_id("fund-42").is_err());
        assert!(parse_node_id("42").is_err());
    }

    #[test]
    fn entity_id_accepts_numbers_and_numeric_strings() {
        let numeric = json!({"id": 7}).as_object().cloned().unwrap_or_default();
        let text = json!({"id": "8"}).as_object().cloned().unwrap_or_default();
        let missing = json!({"name": "x"}).as_object().cloned().unwrap_or_default();
        let negative = json!({"id": -3}).as_object().cloned().unwrap_or_default();

        assert_eq!(entity_id(&numeric), Ok(7));
        assert_eq!(entity_id(&text), Ok(8));
        assert_eq!(entity_id(&missing), Err(GraphError::MissingEntityId));
        assert_eq!(entity_id(&negative), Err(GraphError::MissingEntityId));
    }
}
