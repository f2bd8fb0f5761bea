//! In-process store: one vector of records per collection behind a lock.

use super::{Collection, Filter, Order, Query, Record, Store, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// Tables keyed by collection. Rows keep insertion order; `id` is unique per collection.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<Collection, Vec<Record>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently in a collection.
    pub fn len(&self, collection: Collection) -> usize {
        self.read()
            .map(|tables| tables.get(&collection).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    pub fn is_empty(&self, collection: Collection) -> bool {
        self.len(collection) == 0
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<Collection, Vec<Record>>>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::Unavailable("lock error".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<Collection, Vec<Record>>>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::Unavailable("lock error".to_string()))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn select(&self, collection: Collection, query: &Query) -> Result<Vec<Record>, StoreError> {
        let tables = self.read()?;
        let mut rows: Vec<Record> = tables
            .get(&collection)
            .map(|rows| rows.iter().filter(|r| query.matches(r)).cloned().collect())
            .unwrap_or_default();
        drop(tables);

        if !query.order.is_empty() {
            // stable: ties keep insertion order
            rows.sort_by(|a, b| compare_records(a, b, &query.order));
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    async fn insert(&self, collection: Collection, record: Record) -> Result<Record, StoreError> {
        let mut tables = self.write()?;
        let rows = tables.entry(collection).or_default();
        let record = prepare_new(record);
        ensure_unique_id(rows, &record)?;
        rows.push(record.clone());
        log::debug!("insert into {}", collection.as_str());
        Ok(record)
    }

    async fn update(
        &self,
        collection: Collection,
        filters: &[Filter],
        patch: Record,
    ) -> Result<Vec<Record>, StoreError> {
        let mut tables = self.write()?;
        let Some(rows) = tables.get_mut(&collection) else {
            return Ok(Vec::new());
        };
        let mut updated = Vec::new();
        for row in rows.iter_mut().filter(|r| filters.iter().all(|f| f.matches(r))) {
            merge(row, &patch);
            updated.push(row.clone());
        }
        Ok(updated)
    }

    async fn delete(&self, collection: Collection, filters: &[Filter]) -> Result<usize, StoreError> {
        let mut tables = self.write()?;
        let Some(rows) = tables.get_mut(&collection) else {
            return Ok(0);
        };
        let before = rows.len();
        rows.retain(|r| !filters.iter().all(|f| f.matches(r)));
        Ok(before - rows.len())
    }

    async fn upsert(
        &self,
        collection: Collection,
        records: Vec<Record>,
        on_conflict: &[&str],
    ) -> Result<Vec<Record>, StoreError> {
        let keys: &[&str] = if on_conflict.is_empty() { &["id"] } else { on_conflict };
        let mut tables = self.write()?;
        // Work on a copy so a failing record leaves the table untouched.
        let mut rows = tables.get(&collection).cloned().unwrap_or_default();
        let mut stored = Vec::with_capacity(records.len());

        for record in records {
            if let Some(missing) = keys.iter().find(|k| !record.contains_key(**k)) {
                return Err(StoreError::Rejected {
                    status: 400,
                    message: format!("upsert record is missing conflict column {missing}"),
                });
            }
            let existing = rows
                .iter_mut()
                .find(|row| keys.iter().all(|k| row.get(*k) == record.get(*k)));
            match existing {
                Some(row) => {
                    merge(row, &record);
                    stored.push(row.clone());
                }
                None => {
                    let record = prepare_new(record);
                    ensure_unique_id(&rows, &record)?;
                    rows.push(record.clone());
                    stored.push(record);
                }
            }
        }

        tables.insert(collection, rows);
        log::debug!("upsert {} row(s) into {}", stored.len(), collection.as_str());
        Ok(stored)
    }
}

/// Fill in `id` and `created_at` when absent, like database column defaults.
fn prepare_new(mut record: Record) -> Record {
    if record.get("id").map_or(true, Value::is_null) {
        record.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
    }
    if record.get("created_at").map_or(true, Value::is_null) {
        record.insert("created_at".to_string(), Value::String(Utc::now().to_rfc3339()));
    }
    record
}

fn ensure_unique_id(rows: &[Record], record: &Record) -> Result<(), StoreError> {
    let id = record.get("id");
    if rows.iter().any(|r| r.get("id") == id) {
        return Err(StoreError::Conflict(format!(
            "duplicate id {}",
            id.cloned().unwrap_or(Value::Null)
        )));
    }
    Ok(())
}

/// Overwrite `row` columns with those present in `patch`. The row's `id` never changes.
fn merge(row: &mut Record, patch: &Record) {
    for (key, value) in patch {
        if key == "id" && row.contains_key("id") {
            continue;
        }
        row.insert(key.clone(), value.clone());
    }
}

fn compare_records(a: &Record, b: &Record, order: &[Order]) -> Ordering {
    for o in order {
        let left = a.get(&o.field).unwrap_or(&Value::Null);
        let right = b.get(&o.field).unwrap_or(&Value::Null);
        let ord = compare_values(left, right);
        let ord = if o.ascending { ord } else { ord.reverse() };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

/// Total order over JSON scalars: null < bool < number < string. Strings holding RFC 3339
/// timestamps compare chronologically.
pub(crate) fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => {
            match (
                DateTime::parse_from_rfc3339(x),
                DateTime::parse_from_rfc3339(y),
            ) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                _ => x.cmp(y),
            }
        }
        _ => rank(a).cmp(&rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn timestamps_compare_chronologically() {
        let earlier = json!("2026-03-01T12:00:00.5Z");
        let later = json!("2026-03-01T12:00:01Z");
        assert_eq!(compare_values(&earlier, &later), Ordering::Less);
    }

    #[test]
    fn null_sorts_first() {
        assert_eq!(compare_values(&Value::Null, &json!(0)), Ordering::Less);
        assert_eq!(compare_values(&json!(2), &json!(10)), Ordering::Less);
        assert_eq!(compare_values(&json!("b"), &json!("a")), Ordering::Greater);
    }

    #[test]
    fn merge_keeps_id() {
        let mut row = json!({ "id": "a", "points": 1 }).as_object().cloned().unwrap();
        let patch = json!({ "id": "b", "points": 4 }).as_object().cloned().unwrap();
        merge(&mut row, &patch);
        assert_eq!(row["id"], json!("a"));
        assert_eq!(row["points"], json!(4));
    }
}
