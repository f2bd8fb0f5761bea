//! Integration tests for registration, approval and removal of participants.

use fifa_tournament_web::store::{fetch_all, update_where, Filter, Query};
use fifa_tournament_web::{
    approve_participant, approved_participants, create_tournament, list_participants,
    register_participant, remove_participant, Collection, MemoryStore, NewTournament,
    Registration, Standing, Tournament, TournamentError, TournamentType,
};
use serde_json::json;
use uuid::Uuid;

fn registration(name: &str) -> Registration {
    Registration {
        name: name.to_string(),
        email: Some("player@example.com".to_string()),
        phone: Some("  ".to_string()),
        platform: Some("PS5".to_string()),
    }
}

async fn league(store: &MemoryStore, max: u32) -> Tournament {
    create_tournament(store, NewTournament::named("Ramadan League", TournamentType::League, max))
        .await
        .unwrap()
}

async fn standings_of(store: &MemoryStore, t: &Tournament) -> Vec<Standing> {
    fetch_all(
        store,
        Collection::Standings,
        &Query::new().eq("tournament_id", t.id.to_string()),
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn registration_starts_unapproved() {
    let store = MemoryStore::new();
    let t = league(&store, 8).await;

    let p = register_participant(&store, t.id, registration("  Salem  ")).await.unwrap();
    assert_eq!(p.name, "Salem");
    assert!(!p.is_approved);
    assert_eq!(p.phone, None);
    assert_eq!(p.platform.as_deref(), Some("PS5"));

    assert_eq!(list_participants(&store, t.id, false).await.unwrap().len(), 1);
    assert!(approved_participants(&store, t.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn registration_rejects_blank_names_and_unknown_tournaments() {
    let store = MemoryStore::new();
    let t = league(&store, 8).await;

    assert!(matches!(
        register_participant(&store, t.id, registration("   ")).await,
        Err(TournamentError::EmptyName)
    ));
    let missing = Uuid::new_v4();
    assert!(matches!(
        register_participant(&store, missing, registration("Salem")).await,
        Err(TournamentError::TournamentNotFound(id)) if id == missing
    ));
}

#[tokio::test]
async fn registration_requires_an_active_tournament() {
    let store = MemoryStore::new();
    let t = league(&store, 8).await;
    let _: Vec<Tournament> = update_where(
        &store,
        Collection::Tournaments,
        &[Filter::eq("id", t.id.to_string())],
        &json!({ "status": "paused" }),
    )
    .await
    .unwrap();

    assert!(matches!(
        register_participant(&store, t.id, registration("Salem")).await,
        Err(TournamentError::TournamentClosed)
    ));
}

#[tokio::test]
async fn approval_adds_a_zero_standing_row() {
    let store = MemoryStore::new();
    let t = league(&store, 8).await;
    let p = register_participant(&store, t.id, registration("Salem")).await.unwrap();

    let approved = approve_participant(&store, p.id).await.unwrap();
    assert!(approved.is_approved);

    let rows = standings_of(&store, &t).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].participant_id, p.id);
    assert_eq!(rows[0].played, 0);

    // approving again changes nothing
    approve_participant(&store, p.id).await.unwrap();
    assert_eq!(standings_of(&store, &t).await.len(), 1);
}

#[tokio::test]
async fn capacity_counts_approved_participants() {
    let store = MemoryStore::new();
    let t = league(&store, 2).await;
    let a = register_participant(&store, t.id, registration("A")).await.unwrap();
    let b = register_participant(&store, t.id, registration("B")).await.unwrap();
    let c = register_participant(&store, t.id, registration("C")).await.unwrap();

    approve_participant(&store, a.id).await.unwrap();
    approve_participant(&store, b.id).await.unwrap();

    assert!(matches!(
        approve_participant(&store, c.id).await,
        Err(TournamentError::TournamentFull { max: 2 })
    ));
    assert!(matches!(
        register_participant(&store, t.id, registration("D")).await,
        Err(TournamentError::TournamentFull { max: 2 })
    ));
}

#[tokio::test]
async fn removal_drops_the_participant_and_their_standing() {
    let store = MemoryStore::new();
    let t = league(&store, 8).await;
    let a = register_participant(&store, t.id, registration("A")).await.unwrap();
    let b = register_participant(&store, t.id, registration("B")).await.unwrap();
    approve_participant(&store, a.id).await.unwrap();
    approve_participant(&store, b.id).await.unwrap();

    remove_participant(&store, a.id).await.unwrap();

    let remaining = list_participants(&store, t.id, false).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, b.id);
    let rows = standings_of(&store, &t).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].participant_id, b.id);

    assert!(matches!(
        remove_participant(&store, a.id).await,
        Err(TournamentError::ParticipantNotFound(_))
    ));
}
