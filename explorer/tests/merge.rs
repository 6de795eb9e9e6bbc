mod common;

use std::collections::HashSet;

use common::{company, company_detail, person_detail};
use explorer::graph::{
    EdgeKey, EntityKind, GraphError, GraphStore, LinkCategory, RelationSource, extract,
    merge_expansion, merge_founder, merge_root,
};
use serde_json::json;

fn rooted_company(store: &mut GraphStore) -> anyhow::Result<()> {
    let detail = company_detail(1, &[2], &[(3, "директор")]);
    merge_root(store, extract(detail, EntityKind::Company)?)?;
    Ok(())
}

fn edge_keys(store: &GraphStore) -> HashSet<EdgeKey> {
    store.edges().map(|edge| edge.key()).collect()
}

#[test]
fn company_root_scenario_builds_three_nodes_and_two_edges() -> anyhow::Result<()> {
    let mut store = GraphStore::new();
    rooted_company(&mut store)?;

    assert_eq!(store.node_count(), 3);
    assert_eq!(store.edge_count(), 2);
    assert_eq!(store.root_id(), Some("company-1"));

    let root = store.node("company-1").expect("root node");
    assert!(root.is_root);
    assert!(root.is_opened);
    assert_eq!(root.link_count, 2);
    assert!(!root.attributes.contains_key("founder_of"));

    let owned = store
        .edge_between("company-1", "company-2")
        .expect("ownership edge");
    assert_eq!(owned.link_category, LinkCategory::Owner);
    assert_eq!(owned.source, "company-1");
    assert_eq!(owned.relation_label, None);

    let head = store.edge_between("company-1", "pep-3").expect("pep edge");
    assert_eq!(head.link_category, LinkCategory::Head);
    assert_eq!(head.relation_label.as_deref(), Some("директор"));
    assert_eq!(head.source_list, RelationSource::RelationshipsWithPeps);

    let child = store.node("pep-3").expect("pep node");
    assert!(!child.is_opened);
    assert_eq!(child.parent_id.as_deref(), Some("company-1"));
    assert_eq!(child.link_count, 1);
    Ok(())
}

#[test]
fn expanding_person_links_existing_company_once() -> anyhow::Result<()> {
    let mut store = GraphStore::new();
    rooted_company(&mut store)?;

    let detail = person_detail(3, &[], &[], &[2]);
    let report = merge_expansion(&mut store, "pep-3", extract(detail, EntityKind::Person)?)?;

    assert!(report.nodes_added.is_empty());
    assert_eq!(report.edges_added, vec!["pep-3-company-2".to_string()]);
    assert_eq!(store.node_count(), 3);
    assert_eq!(store.edge_count(), 3);

    let edge = store.edge_between("company-2", "pep-3").expect("review edge");
    assert_eq!(edge.link_category, LinkCategory::Owner);
    assert_eq!(edge.source_list, RelationSource::CheckCompanies);
    assert!(store.node("pep-3").is_some_and(|node| node.is_opened));
    Ok(())
}

#[test]
fn reversed_pair_is_a_duplicate() -> anyhow::Result<()> {
    let mut store = GraphStore::new();
    rooted_company(&mut store)?;

    // pep-3 lists the root back; root-pep pair already exists
    let detail = person_detail(3, &[(1, "директор")], &[], &[]);
    let report = merge_expansion(&mut store, "pep-3", extract(detail, EntityKind::Person)?)?;

    assert!(report.is_noop());
    assert_eq!(report.duplicates, 1);
    assert_eq!(store.edge_count(), 2);
    let edge = store.edge_between("pep-3", "company-1").expect("original edge");
    assert_eq!(edge.source, "company-1");
    Ok(())
}

#[test]
fn merging_same_expansion_twice_is_idempotent() -> anyhow::Result<()> {
    let mut store = GraphStore::new();
    rooted_company(&mut store)?;

    let detail = company_detail(2, &[4, 5], &[(6, "власник")]);
    merge_expansion(&mut store, "company-2", extract(detail.clone(), EntityKind::Company)?)?;
    let nodes: HashSet<String> = store.nodes().map(|node| node.id.clone()).collect();
    let edges = edge_keys(&store);

    let second = merge_expansion(&mut store, "company-2", extract(detail, EntityKind::Company)?)?;
    assert!(second.already_opened);
    assert!(second.is_noop());

    let nodes_after: HashSet<String> = store.nodes().map(|node| node.id.clone()).collect();
    assert_eq!(nodes, nodes_after);
    assert_eq!(edges, edge_keys(&store));
    assert_eq!(store.edge_count(), edges.len());
    Ok(())
}

#[test]
fn root_merge_of_same_payload_twice_gives_same_graph() -> anyhow::Result<()> {
    let detail = company_detail(1, &[2, 2, 3], &[(4, "син")]);
    let mut store = GraphStore::new();

    let first = merge_root(&mut store, extract(detail.clone(), EntityKind::Company)?)?;
    assert_eq!(first.duplicates, 1);
    let edges = edge_keys(&store);

    merge_root(&mut store, extract(detail, EntityKind::Company)?)?;
    assert_eq!(edges, edge_keys(&store));
    assert_eq!(store.node_count(), 4);
    assert_eq!(store.generation(), 2);
    Ok(())
}

#[test]
fn self_reference_creates_no_edge() -> anyhow::Result<()> {
    let mut store = GraphStore::new();
    let detail = company_detail(1, &[1, 2], &[]);
    let report = merge_root(&mut store, extract(detail, EntityKind::Company)?)?;

    assert_eq!(report.self_loops, 1);
    assert_eq!(store.edge_count(), 1);
    assert!(store.edges().all(|edge| edge.source != edge.target));
    Ok(())
}

#[test]
fn same_number_different_kind_are_distinct_nodes() -> anyhow::Result<()> {
    let mut store = GraphStore::new();
    let detail = company_detail(7, &[], &[(7, "власник")]);
    merge_root(&mut store, extract(detail, EntityKind::Company)?)?;

    assert!(store.contains_node("company-7"));
    assert!(store.contains_node("pep-7"));
    assert_eq!(store.edge_count(), 1);
    Ok(())
}

#[test]
fn bad_items_are_counted_and_the_rest_merged() -> anyhow::Result<()> {
    let mut store = GraphStore::new();
    let detail = json!({
        "id": 1,
        "founder_of": [{"name": "no id"}, company(2, "ok"), "garbage"],
        "relationships_with_peps": [{"relationship_type": "директор"}]
    });
    let report = merge_root(&mut store, extract(detail, EntityKind::Company)?)?;

    assert_eq!(report.failed, 3);
    assert_eq!(report.nodes_added, vec!["company-2".to_string()]);
    assert_eq!(store.node_count(), 2);
    Ok(())
}

#[test]
fn expansion_errors_leave_graph_untouched() -> anyhow::Result<()> {
    let mut store = GraphStore::new();
    rooted_company(&mut store)?;
    let before = store.snapshot();

    let missing = merge_expansion(
        &mut store,
        "company-99",
        extract(company_detail(99, &[5], &[]), EntityKind::Company)?,
    );
    assert_eq!(missing, Err(GraphError::UnknownNode("company-99".into())));

    let mismatch = merge_expansion(
        &mut store,
        "pep-3",
        extract(company_detail(3, &[5], &[]), EntityKind::Company)?,
    );
    assert!(matches!(mismatch, Err(GraphError::KindMismatch { .. })));

    assert_eq!(before, store.snapshot());
    Ok(())
}

#[test]
fn children_start_at_parent_position() -> anyhow::Result<()> {
    let mut store = GraphStore::new();
    rooted_company(&mut store)?;
    let applied = store.apply_positions(&[explorer::graph::PositionUpdate {
        id: "company-2".into(),
        x: 12.0,
        y: -4.5,
    }]);
    assert_eq!(applied, 1);

    merge_expansion(
        &mut store,
        "company-2",
        extract(company_detail(2, &[8], &[]), EntityKind::Company)?,
    )?;
    let child = store.node("company-8").expect("child");
    let position = child.position.expect("seeded position");
    assert_eq!((position.x, position.y), (12.0, -4.5));
    Ok(())
}

#[test]
fn founder_company_joins_with_its_holdings() -> anyhow::Result<()> {
    let mut store = GraphStore::new();
    rooted_company(&mut store)?;

    // company-50 founded the selected root and another company
    let founder = json!({
        "id": 50,
        "edrpou": "00000050",
        "name": "Holding",
        "founder_of": [company(1, "Root"), company(60, "Sibling")],
        "relationships_with_peps": [
            {"pep": {"id": 70}, "relationship_type": "директор"}
        ]
    });
    let report = merge_founder(&mut store, "company-1", extract(founder, EntityKind::Company)?)?;

    assert_eq!(
        report.nodes_added,
        vec!["company-50".to_string(), "company-60".to_string()]
    );
    assert!(!store.contains_node("pep-70"));

    let holding = store.node("company-50").expect("founder node");
    assert!(holding.is_opened);
    assert!(!holding.is_root);

    let link = store
        .edge_between("company-50", "company-1")
        .expect("founder link");
    assert_eq!(link.source, "company-50");
    assert_eq!(link.link_category, LinkCategory::Owner);
    Ok(())
}

#[test]
fn founder_payload_must_be_a_company() -> anyhow::Result<()> {
    let mut store = GraphStore::new();
    rooted_company(&mut store)?;
    let payload = extract(person_detail(9, &[], &[], &[]), EntityKind::Person)?;

    assert!(matches!(
        merge_founder(&mut store, "company-1", payload),
        Err(GraphError::KindMismatch { .. })
    ));
    Ok(())
}
