//! Record store abstraction: named collections of JSON records with filtered reads,
//! inserts, updates, deletes and keyed upserts.
//!
//! The tournament logic only talks to [`Store`]; [`MemoryStore`] keeps everything in
//! process and [`RestStore`] talks to a hosted PostgREST-style database API.

mod memory;
mod rest;

pub use memory::MemoryStore;
pub use rest::RestStore;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// One stored row: a JSON object keyed by column name.
pub type Record = serde_json::Map<String, Value>;

/// Store failures. Always fatal for the operation that issued the call.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Record not found")]
    NotFound,
    /// Unique key or constraint violation.
    #[error("Conflicting record: {0}")]
    Conflict(String),
    #[error("Store rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
    /// Transport or connectivity failure.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error("Invalid record: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Value is not a record")]
    NotARecord,
}

/// Named record collections.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Collection {
    Tournaments,
    Participants,
    Matches,
    Standings,
    Bracket,
    Advertisements,
    Settings,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Tournaments => "tournaments",
            Collection::Participants => "participants",
            Collection::Matches => "matches",
            Collection::Standings => "standings",
            Collection::Bracket => "bracket",
            Collection::Advertisements => "advertisements",
            Collection::Settings => "settings",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FilterOp {
    Eq,
    Neq,
}

/// Column predicate.
#[derive(Clone, Debug, PartialEq)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Eq,
            value: value.into(),
        }
    }

    pub fn neq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Neq,
            value: value.into(),
        }
    }

    /// Missing columns compare as null.
    pub fn matches(&self, record: &Record) -> bool {
        let actual = record.get(&self.field).unwrap_or(&Value::Null);
        match self.op {
            FilterOp::Eq => *actual == self.value,
            FilterOp::Neq => *actual != self.value,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    pub field: String,
    pub ascending: bool,
}

/// Filtered, ordered, limited read. Rows without an ordering come back in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order: Vec<Order>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::eq(field, value));
        self
    }

    pub fn neq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::neq(field, value));
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, ascending: bool) -> Self {
        self.order.push(Order {
            field: field.into(),
            ascending,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.filters.iter().all(|f| f.matches(record))
    }
}

/// Remote (or in-process) persistent store.
#[async_trait]
pub trait Store: Send + Sync {
    /// Read rows matching the query.
    async fn select(&self, collection: Collection, query: &Query) -> Result<Vec<Record>, StoreError>;

    /// Insert one row and return it as stored (with generated columns filled in).
    async fn insert(&self, collection: Collection, record: Record) -> Result<Record, StoreError>;

    /// Merge `patch` into every row matching all filters; returns the updated rows.
    async fn update(
        &self,
        collection: Collection,
        filters: &[Filter],
        patch: Record,
    ) -> Result<Vec<Record>, StoreError>;

    /// Delete every row matching all filters; returns how many were removed.
    async fn delete(&self, collection: Collection, filters: &[Filter]) -> Result<usize, StoreError>;

    /// Insert or overwrite each record, matching existing rows on the `on_conflict` columns.
    /// The whole batch goes out in one call.
    async fn upsert(
        &self,
        collection: Collection,
        records: Vec<Record>,
        on_conflict: &[&str],
    ) -> Result<Vec<Record>, StoreError>;
}

/// Serialize a model into a store record.
pub fn to_record<T: Serialize>(value: &T) -> Result<Record, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::NotARecord),
    }
}

pub fn from_record<T: DeserializeOwned>(record: Record) -> Result<T, StoreError> {
    Ok(serde_json::from_value(Value::Object(record))?)
}

/// Typed `select`.
pub async fn fetch_all<T: DeserializeOwned>(
    store: &dyn Store,
    collection: Collection,
    query: &Query,
) -> Result<Vec<T>, StoreError> {
    store
        .select(collection, query)
        .await?
        .into_iter()
        .map(from_record)
        .collect()
}

/// First row of a query, if any.
pub async fn fetch_one<T: DeserializeOwned>(
    store: &dyn Store,
    collection: Collection,
    query: Query,
) -> Result<Option<T>, StoreError> {
    let rows = store.select(collection, &query.limit(1)).await?;
    rows.into_iter().next().map(from_record).transpose()
}

/// Typed `insert`.
pub async fn insert_one<T: Serialize + DeserializeOwned>(
    store: &dyn Store,
    collection: Collection,
    value: &T,
) -> Result<T, StoreError> {
    let stored = store.insert(collection, to_record(value)?).await?;
    from_record(stored)
}

/// Typed `update`; `patch` must serialize to an object.
pub async fn update_where<T: DeserializeOwned>(
    store: &dyn Store,
    collection: Collection,
    filters: &[Filter],
    patch: &impl Serialize,
) -> Result<Vec<T>, StoreError> {
    store
        .update(collection, filters, to_record(patch)?)
        .await?
        .into_iter()
        .map(from_record)
        .collect()
}

/// Typed batch `upsert`.
pub async fn upsert_all<T: Serialize + DeserializeOwned>(
    store: &dyn Store,
    collection: Collection,
    values: &[T],
    on_conflict: &[&str],
) -> Result<Vec<T>, StoreError> {
    let records = values.iter().map(to_record).collect::<Result<Vec<_>, _>>()?;
    store
        .upsert(collection, records, on_conflict)
        .await?
        .into_iter()
        .map(from_record)
        .collect()
}
