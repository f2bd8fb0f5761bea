//! Behaviour of the in-process record store.

use fifa_tournament_web::store::{Filter, Query, Record};
use fifa_tournament_web::{Collection, MemoryStore, Store, StoreError};
use serde_json::{json, Value};

fn record(value: Value) -> Record {
    value.as_object().cloned().unwrap()
}

async fn seeded() -> MemoryStore {
    let store = MemoryStore::new();
    for (name, points, group) in [("A", 3, "x"), ("B", 7, "y"), ("C", 3, "x"), ("D", 1, "y")] {
        store
            .insert(
                Collection::Standings,
                record(json!({ "name": name, "points": points, "group": group })),
            )
            .await
            .unwrap();
    }
    store
}

fn names(rows: &[Record]) -> Vec<&str> {
    rows.iter().map(|r| r["name"].as_str().unwrap()).collect()
}

#[tokio::test]
async fn insert_fills_id_and_created_at() {
    let store = MemoryStore::new();
    let row = store
        .insert(Collection::Tournaments, record(json!({ "name": "Cup" })))
        .await
        .unwrap();
    assert!(row["id"].as_str().is_some_and(|id| uuid::Uuid::parse_str(id).is_ok()));
    assert!(row["created_at"].is_string());

    let duplicate = record(json!({ "id": row["id"].clone(), "name": "Again" }));
    assert!(matches!(
        store.insert(Collection::Tournaments, duplicate).await,
        Err(StoreError::Conflict(_))
    ));
    assert_eq!(store.len(Collection::Tournaments), 1);
}

#[tokio::test]
async fn select_filters_orders_and_limits() {
    let store = seeded().await;

    let all = store.select(Collection::Standings, &Query::new()).await.unwrap();
    assert_eq!(names(&all), vec!["A", "B", "C", "D"]);

    let xs = store
        .select(Collection::Standings, &Query::new().eq("group", "x"))
        .await
        .unwrap();
    assert_eq!(names(&xs), vec!["A", "C"]);

    let not_x = store
        .select(Collection::Standings, &Query::new().neq("group", "x"))
        .await
        .unwrap();
    assert_eq!(names(&not_x), vec!["B", "D"]);

    // ties on points keep insertion order
    let ranked = store
        .select(Collection::Standings, &Query::new().order_by("points", false))
        .await
        .unwrap();
    assert_eq!(names(&ranked), vec!["B", "A", "C", "D"]);

    let top = store
        .select(
            Collection::Standings,
            &Query::new().order_by("points", false).order_by("name", false).limit(2),
        )
        .await
        .unwrap();
    assert_eq!(names(&top), vec!["B", "C"]);
}

#[tokio::test]
async fn missing_columns_match_null() {
    let store = seeded().await;
    let rows = store
        .select(Collection::Standings, &Query::new().eq("note", Value::Null))
        .await
        .unwrap();
    assert_eq!(rows.len(), 4);
}

#[tokio::test]
async fn update_merges_patch_into_matching_rows() {
    let store = seeded().await;
    let updated = store
        .update(
            Collection::Standings,
            &[Filter::eq("group", "y")],
            record(json!({ "points": 0, "note": "reset" })),
        )
        .await
        .unwrap();
    assert_eq!(names(&updated), vec!["B", "D"]);
    assert!(updated.iter().all(|r| r["points"] == json!(0) && r["note"] == json!("reset")));

    let untouched = store
        .select(Collection::Standings, &Query::new().eq("name", "A"))
        .await
        .unwrap();
    assert_eq!(untouched[0]["points"], json!(3));
}

#[tokio::test]
async fn delete_reports_removed_rows() {
    let store = seeded().await;
    let removed = store
        .delete(Collection::Standings, &[Filter::eq("group", "x")])
        .await
        .unwrap();
    assert_eq!(removed, 2);
    assert_eq!(store.len(Collection::Standings), 2);
    assert_eq!(
        store.delete(Collection::Matches, &[Filter::eq("group", "x")]).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn upsert_overwrites_on_conflict_keys() {
    let store = MemoryStore::new();
    let keys = ["tournament_id", "participant_id"];
    let first = store
        .upsert(
            Collection::Standings,
            vec![
                record(json!({ "tournament_id": "t", "participant_id": "a", "points": 1 })),
                record(json!({ "tournament_id": "t", "participant_id": "b", "points": 0 })),
            ],
            &keys,
        )
        .await
        .unwrap();
    let id_of_a = first[0]["id"].clone();

    let second = store
        .upsert(
            Collection::Standings,
            vec![record(json!({ "tournament_id": "t", "participant_id": "a", "points": 4 }))],
            &keys,
        )
        .await
        .unwrap();

    assert_eq!(store.len(Collection::Standings), 2);
    assert_eq!(second[0]["id"], id_of_a);
    assert_eq!(second[0]["points"], json!(4));
}

#[tokio::test]
async fn upsert_is_all_or_nothing() {
    let store = MemoryStore::new();
    let result = store
        .upsert(
            Collection::Standings,
            vec![
                record(json!({ "tournament_id": "t", "participant_id": "a" })),
                record(json!({ "tournament_id": "t" })),
            ],
            &["tournament_id", "participant_id"],
        )
        .await;

    assert!(matches!(result, Err(StoreError::Rejected { status: 400, .. })));
    assert!(store.is_empty(Collection::Standings));
}
