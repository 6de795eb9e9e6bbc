use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use tracing::{debug, warn};

use super::{DetailSource, SearchHit, SearchQuery, detail_path};
use crate::graph::{EntityKind, entity_id, entity_label, resolve_id};

#[derive(Debug, Clone)]
pub struct HttpSourceConfig {
    pub api_host: String,
    pub token: Option<String>,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

pub struct HttpDetailSource {
    http: Client,
    base: String,
    token: Option<String>,
}

impl HttpDetailSource {
    pub fn new(config: HttpSourceConfig) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .context("failed to build http client")?;
        Ok(Self {
            http,
            base: config.api_host.trim_end_matches('/').to_string(),
            token: config.token,
        })
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let request = self.http.get(format!("{}{}", self.base, path));
        match &self.token {
            Some(token) => request.header("Authorization", format!("Token {token}")),
            None => request,
        }
    }

    async fn get_json(&self, request: RequestBuilder, what: &str) -> Result<Value> {
        let response = request
            .send()
            .await
            .with_context(|| format!("network error requesting {what}"))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("data api returned {status} for {what}: {body}");
        }
        response
            .json::<Value>()
            .await
            .with_context(|| format!("invalid json in {what}"))
    }
}

#[async_trait]
impl DetailSource for HttpDetailSource {
    async fn fetch_detail(&self, kind: EntityKind, entity_id: u64) -> Result<Value> {
        let path = detail_path(kind, entity_id);
        debug!(%path, "fetching entity detail");
        self.get_json(self.get(&path), &path).await
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>> {
        let kind = query.kind();
        let path = format!("/api/{}/", kind.prefix());
        let (key, value) = query.param();
        let body = self
            .get_json(self.get(&path).query(&[(key, value)]), &path)
            .await?;

        let results = body
            .get("results")
            .and_then(Value::as_array)
            .ok_or_else(|| anyhow!("search response for {path} has no results array"))?;

        let hits = results
            .iter()
            .filter_map(Value::as_object)
            .filter_map(|record| match entity_id(record) {
                Ok(id) => Some(SearchHit {
                    kind,
                    entity_id: id,
                    node_id: resolve_id(kind, id),
                    label: entity_label(kind, record),
                }),
                Err(err) => {
                    warn!(error = %err, "skipping search result without id");
                    None
                }
            })
            .collect();
        Ok(hits)
    }
}
