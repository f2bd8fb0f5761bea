//! Client for a hosted PostgREST-style database API (`{base}/rest/v1/{collection}`).

use super::{Collection, Filter, FilterOp, Query, Record, Store, StoreError};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;

const RETURN_REPRESENTATION: &str = "return=representation";
const MERGE_DUPLICATES: &str = "resolution=merge-duplicates,return=representation";

/// Store backed by the hosted database's REST interface.
#[derive(Clone, Debug)]
pub struct RestStore {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl RestStore {
    /// `base_url` is the project URL (without `/rest/v1`); `api_key` is sent both as
    /// `apikey` and as the bearer token.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(transport)?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    fn endpoint(&self, collection: Collection) -> String {
        format!("{}/rest/v1/{}", self.base_url, collection.as_str())
    }

    fn request(&self, method: Method, collection: Collection) -> RequestBuilder {
        self.client
            .request(method, self.endpoint(collection))
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }
}

#[async_trait]
impl Store for RestStore {
    async fn select(&self, collection: Collection, query: &Query) -> Result<Vec<Record>, StoreError> {
        log::debug!("GET {} {:?}", collection.as_str(), query);
        let response = self
            .request(Method::GET, collection)
            .query(&query_params(query))
            .send()
            .await
            .map_err(transport)?;
        read_rows(response).await
    }

    async fn insert(&self, collection: Collection, record: Record) -> Result<Record, StoreError> {
        let response = self
            .request(Method::POST, collection)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&record)
            .send()
            .await
            .map_err(transport)?;
        read_rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Rejected {
                status: 200,
                message: "insert returned no rows".to_string(),
            })
    }

    async fn update(
        &self,
        collection: Collection,
        filters: &[Filter],
        patch: Record,
    ) -> Result<Vec<Record>, StoreError> {
        let params: Vec<_> = filters.iter().map(filter_param).collect();
        let response = self
            .request(Method::PATCH, collection)
            .header("Prefer", RETURN_REPRESENTATION)
            .query(&params)
            .json(&patch)
            .send()
            .await
            .map_err(transport)?;
        read_rows(response).await
    }

    async fn delete(&self, collection: Collection, filters: &[Filter]) -> Result<usize, StoreError> {
        let params: Vec<_> = filters.iter().map(filter_param).collect();
        let response = self
            .request(Method::DELETE, collection)
            .header("Prefer", RETURN_REPRESENTATION)
            .query(&params)
            .send()
            .await
            .map_err(transport)?;
        Ok(read_rows(response).await?.len())
    }

    async fn upsert(
        &self,
        collection: Collection,
        records: Vec<Record>,
        on_conflict: &[&str],
    ) -> Result<Vec<Record>, StoreError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }
        let mut request = self
            .request(Method::POST, collection)
            .header("Prefer", MERGE_DUPLICATES);
        if !on_conflict.is_empty() {
            request = request.query(&[("on_conflict", on_conflict.join(","))]);
        }
        let response = request.json(&records).send().await.map_err(transport)?;
        read_rows(response).await
    }
}

fn transport(e: reqwest::Error) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

async fn read_rows(response: Response) -> Result<Vec<Record>, StoreError> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        log::debug!("store responded {status}: {message}");
        return Err(error_for_status(status.as_u16(), message));
    }
    response.json::<Vec<Record>>().await.map_err(transport)
}

fn error_for_status(status: u16, message: String) -> StoreError {
    match status {
        404 => StoreError::NotFound,
        409 => StoreError::Conflict(message),
        _ => StoreError::Rejected { status, message },
    }
}

/// Query-string pairs: `select`, one pair per filter, `order`, `limit`.
fn query_params(query: &Query) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), "*".to_string())];
    params.extend(query.filters.iter().map(filter_param));
    if !query.order.is_empty() {
        let order = query
            .order
            .iter()
            .map(|o| format!("{}.{}", o.field, if o.ascending { "asc" } else { "desc" }))
            .collect::<Vec<_>>()
            .join(",");
        params.push(("order".to_string(), order));
    }
    if let Some(limit) = query.limit {
        params.push(("limit".to_string(), limit.to_string()));
    }
    params
}

fn filter_param(filter: &Filter) -> (String, String) {
    let expr = match (&filter.value, filter.op) {
        (Value::Null, FilterOp::Eq) => "is.null".to_string(),
        (Value::Null, FilterOp::Neq) => "not.is.null".to_string(),
        (value, FilterOp::Eq) => format!("eq.{}", literal(value)),
        (value, FilterOp::Neq) => format!("neq.{}", literal(value)),
    };
    (filter.field.clone(), expr)
}

fn literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
