#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use explorer::{
    graph::{EntityKind, resolve_id},
    source::{DetailSource, SearchHit, SearchQuery},
};
use serde_json::{Value, json};

/// In-memory data API keyed by entity.
#[derive(Default)]
pub struct StubSource {
    details: Mutex<HashMap<(EntityKind, u64), Value>>,
    pub fetches: AtomicUsize,
}

impl StubSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with(self: Arc<Self>, kind: EntityKind, id: u64, detail: Value) -> Arc<Self> {
        self.put(kind, id, detail);
        self
    }

    pub fn put(&self, kind: EntityKind, id: u64, detail: Value) {
        if let Ok(mut details) = self.details.lock() {
            details.insert((kind, id), detail);
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DetailSource for StubSource {
    async fn fetch_detail(&self, kind: EntityKind, entity_id: u64) -> Result<Value> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let details = self.details.lock().map_err(|_| anyhow!("stub poisoned"))?;
        details
            .get(&(kind, entity_id))
            .cloned()
            .ok_or_else(|| anyhow!("data api returned 404 Not Found for {kind}/{entity_id}"))
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>> {
        let kind = query.kind();
        let details = self.details.lock().map_err(|_| anyhow!("stub poisoned"))?;
        let mut hits: Vec<SearchHit> = details
            .iter()
            .filter(|((entry_kind, _), _)| *entry_kind == kind)
            .filter(|(_, detail)| match query {
                SearchQuery::CompanyCode(code) => {
                    detail.get("edrpou").and_then(Value::as_str) == Some(code.as_str())
                }
                SearchQuery::PersonName(name) => detail
                    .get("fullname")
                    .and_then(Value::as_str)
                    .is_some_and(|fullname| fullname.contains(name.as_str())),
            })
            .map(|((kind, id), detail)| SearchHit {
                kind: *kind,
                entity_id: *id,
                node_id: resolve_id(*kind, *id),
                label: detail
                    .get("fullname")
                    .or_else(|| detail.get("name"))
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            })
            .collect();
        hits.sort_by_key(|hit| hit.entity_id);
        Ok(hits)
    }
}

pub fn company(id: u64, name: &str) -> Value {
    json!({"id": id, "edrpou": format!("{:08}", id), "name": name})
}

pub fn person(id: u64, fullname: &str) -> Value {
    json!({"id": id, "fullname": fullname})
}

/// Company detail payload with owned companies and linked persons.
pub fn company_detail(id: u64, founder_of: &[u64], peps: &[(u64, &str)]) -> Value {
    let mut detail = company(id, &format!("Company {id}"));
    detail["founder_of"] = founder_of
        .iter()
        .map(|child| company(*child, &format!("Company {child}")))
        .collect();
    detail["relationships_with_peps"] = peps
        .iter()
        .map(|(pep, label)| {
            json!({"pep": person(*pep, &format!("Person {pep}")), "relationship_type": label})
        })
        .collect();
    detail
}

/// Person detail payload with related companies, linked persons and
/// companies under review.
pub fn person_detail(
    id: u64,
    related_companies: &[(u64, &str)],
    person_links: &[(u64, &str)],
    check_companies: &[u64],
) -> Value {
    let mut detail = person(id, &format!("Person {id}"));
    detail["related_companies"] = related_companies
        .iter()
        .map(|(company_id, label)| {
            json!({
                "company": company(*company_id, &format!("Company {company_id}")),
                "relationship_type": label
            })
        })
        .collect();
    detail["from_person_links"] = person_links
        .iter()
        .map(|(other, label)| {
            json!({
                "to_person": person(*other, &format!("Person {other}")),
                "to_person_relationship_type": label
            })
        })
        .collect();
    detail["check_companies"] = check_companies
        .iter()
        .map(|company_id| company(*company_id, &format!("Company {company_id}")))
        .collect();
    detail
}
