//! Integration tests for scheduling matches and recording results.

use fifa_tournament_web::store::insert_one;
use fifa_tournament_web::{
    create_tournament, delete_match, list_matches, load_standings, record_match_result,
    schedule_match, Collection, GameMatch, MatchStatus, MemoryStore, NewMatch, NewTournament,
    Participant, TournamentError, TournamentId, TournamentType, MAX_SCORE,
};
use uuid::Uuid;

async fn league_with(store: &MemoryStore, names: &[&str]) -> (TournamentId, Vec<Participant>) {
    let t = create_tournament(store, NewTournament::named("League", TournamentType::League, 16))
        .await
        .unwrap();
    let mut ps = Vec::new();
    for name in names {
        let p = Participant::approved(t.id, *name);
        ps.push(insert_one(store, Collection::Participants, &p).await.unwrap());
    }
    (t.id, ps)
}

fn fixture(a: &Participant, b: &Participant) -> NewMatch {
    NewMatch {
        participant1_id: a.id,
        participant2_id: b.id,
        round: 1,
        match_date: None,
    }
}

#[tokio::test]
async fn scheduling_numbers_matches_within_a_round() {
    let store = MemoryStore::new();
    let (t, ps) = league_with(&store, &["A", "B", "C"]).await;

    let first = schedule_match(&store, t, fixture(&ps[0], &ps[1])).await.unwrap();
    let second = schedule_match(&store, t, fixture(&ps[1], &ps[2])).await.unwrap();
    assert_eq!((first.match_number, second.match_number), (1, 2));
    assert_eq!(first.status, MatchStatus::Pending);
    assert_eq!((first.participant1_score, first.participant2_score), (0, 0));

    let listed = list_matches(&store, t).await.unwrap();
    assert_eq!(listed.iter().map(|m| m.id).collect::<Vec<_>>(), vec![first.id, second.id]);
}

#[tokio::test]
async fn scheduling_requires_two_distinct_approved_participants() {
    let store = MemoryStore::new();
    let (t, ps) = league_with(&store, &["A", "B"]).await;
    let mut pending = Participant::approved(t, "Pending");
    pending.is_approved = false;
    let pending = insert_one(&store, Collection::Participants, &pending).await.unwrap();

    assert!(matches!(
        schedule_match(&store, t, fixture(&ps[0], &pending)).await,
        Err(TournamentError::ParticipantNotFound(id)) if id == pending.id
    ));
    assert!(matches!(
        schedule_match(&store, t, fixture(&ps[0], &ps[0])).await,
        Err(TournamentError::MatchNotPlayable)
    ));
}

#[tokio::test]
async fn recording_a_result_completes_the_match_and_updates_standings() {
    let store = MemoryStore::new();
    let (t, ps) = league_with(&store, &["A", "B"]).await;
    let m = schedule_match(&store, t, fixture(&ps[0], &ps[1])).await.unwrap();

    let done = record_match_result(&store, m.id, 1, 3).await.unwrap();
    assert_eq!(done.status, MatchStatus::Completed);
    assert_eq!((done.participant1_score, done.participant2_score), (1, 3));
    assert!(done.match_date.is_some());

    let table = load_standings(&store, t).await.unwrap();
    assert_eq!(table[0].name, "B");
    assert_eq!(table[0].standing.points, 3);
    assert_eq!(table[1].standing.lost, 1);

    // correcting the score rewrites the table instead of adding to it
    record_match_result(&store, m.id, 2, 2).await.unwrap();
    let table = load_standings(&store, t).await.unwrap();
    assert!(table.iter().all(|e| e.standing.played == 1 && e.standing.points == 1));
}

#[tokio::test]
async fn byes_and_cancelled_matches_cannot_take_results() {
    let store = MemoryStore::new();
    let (t, ps) = league_with(&store, &["A", "B"]).await;
    let bye = insert_one(&store, Collection::Matches, &GameMatch::new(t, Some(ps[0].id), None, 1, 1))
        .await
        .unwrap();
    let mut cancelled = GameMatch::new(t, Some(ps[0].id), Some(ps[1].id), 1, 2);
    cancelled.status = MatchStatus::Cancelled;
    let cancelled = insert_one(&store, Collection::Matches, &cancelled).await.unwrap();

    for id in [bye.id, cancelled.id] {
        assert!(matches!(
            record_match_result(&store, id, 1, 0).await,
            Err(TournamentError::MatchNotPlayable)
        ));
    }
    let missing = Uuid::new_v4();
    assert!(matches!(
        record_match_result(&store, missing, 1, 0).await,
        Err(TournamentError::MatchNotFound(id)) if id == missing
    ));
}

#[tokio::test]
async fn deleting_a_completed_match_refreshes_standings() {
    let store = MemoryStore::new();
    let (t, ps) = league_with(&store, &["A", "B"]).await;
    let m = schedule_match(&store, t, fixture(&ps[0], &ps[1])).await.unwrap();
    record_match_result(&store, m.id, 4, 0).await.unwrap();

    delete_match(&store, m.id).await.unwrap();

    assert!(list_matches(&store, t).await.unwrap().is_empty());
    let table = load_standings(&store, t).await.unwrap();
    assert_eq!(table.len(), 2);
    assert!(table.iter().all(|e| e.standing.played == 0 && e.standing.points == 0));
}

#[tokio::test]
async fn oversized_scores_are_refused_before_saving() {
    let store = MemoryStore::new();
    let (t, ps) = league_with(&store, &["A", "B"]).await;
    let first = schedule_match(&store, t, fixture(&ps[0], &ps[1])).await.unwrap();
    let second = schedule_match(&store, t, fixture(&ps[0], &ps[1])).await.unwrap();

    for id in [first.id, second.id] {
        assert!(matches!(
            record_match_result(&store, id, 3_000_000_000, 0).await,
            Err(TournamentError::ScoreOutOfRange { max: MAX_SCORE })
        ));
    }
    assert!(list_matches(&store, t)
        .await
        .unwrap()
        .iter()
        .all(|m| m.status == MatchStatus::Pending));

    // the largest accepted score, twice, still recalculates cleanly
    record_match_result(&store, first.id, MAX_SCORE, 0).await.unwrap();
    record_match_result(&store, second.id, MAX_SCORE, 0).await.unwrap();
    let table = load_standings(&store, t).await.unwrap();
    assert_eq!(table[0].name, "A");
    assert_eq!(table[0].standing.goals_for, 2 * MAX_SCORE);
    assert_eq!(table[0].standing.points, 6);
}

