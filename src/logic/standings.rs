//! League table: recompute standings from completed matches and rank them.

use crate::logic::participants::{approved_participants, list_participants};
use crate::models::{
    GameMatch, MatchStatus, Participant, ParticipantId, Standing, StandingEntry, TournamentError,
    TournamentId,
};
use crate::store::{fetch_all, upsert_all, Collection, Query, Store};
use chrono::Utc;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Columns identifying a standings row.
pub const STANDINGS_CONFLICT_KEY: [&str; 2] = ["tournament_id", "participant_id"];

/// Build one row per approved participant from the completed matches.
///
/// 1. Start every approved participant at zero (in the given order).
/// 2. For each completed match, skip it unless both sides are approved participants.
/// 3. Count played and goals for both sides; 3 points for a win, 1 each for a draw.
///
/// Rows come back unranked, in participant order.
pub fn compute_standings(
    tournament_id: TournamentId,
    participants: &[Participant],
    matches: &[GameMatch],
) -> Vec<Standing> {
    let mut rows: Vec<Standing> = Vec::with_capacity(participants.len());
    let mut index: HashMap<ParticipantId, usize> = HashMap::with_capacity(participants.len());
    for p in participants.iter().filter(|p| p.is_approved) {
        if index.contains_key(&p.id) {
            continue;
        }
        index.insert(p.id, rows.len());
        rows.push(Standing::new(tournament_id, p.id));
    }

    for m in matches.iter().filter(|m| m.is_completed()) {
        let sides = (
            m.participant1_id.and_then(|id| index.get(&id).copied()),
            m.participant2_id.and_then(|id| index.get(&id).copied()),
        );
        let (Some(first), Some(second)) = sides else {
            log::debug!("skipping match {}: participant not in approved set", m.id);
            continue;
        };
        rows[first].record(m.participant1_score, m.participant2_score);
        rows[second].record(m.participant2_score, m.participant1_score);
    }

    rows
}

/// Ranking comparator: points desc, then goal difference desc.
pub fn compare_standings(a: &Standing, b: &Standing) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.goal_difference().cmp(&a.goal_difference()))
}

/// Sort in place. The sort is stable, so rows equal on both keys keep their order.
pub fn rank_standings(rows: &mut [Standing]) {
    rows.sort_by(compare_standings);
}

/// Recompute and persist the league table for a tournament.
///
/// Fetches completed matches and approved participants, rebuilds every row and writes
/// them in one upsert keyed on (tournament, participant), so re-running overwrites rather
/// than accumulates. Returns the ranked rows.
pub async fn calculate_league_standings(
    store: &dyn Store,
    tournament_id: TournamentId,
) -> Result<Vec<Standing>, TournamentError> {
    let matches: Vec<GameMatch> = fetch_all(
        store,
        Collection::Matches,
        &Query::new()
            .eq("tournament_id", tournament_id.to_string())
            .eq("status", MatchStatus::Completed.as_str()),
    )
    .await?;
    let participants = approved_participants(store, tournament_id).await?;

    let mut rows = compute_standings(tournament_id, &participants, &matches);
    rank_standings(&mut rows);
    let now = Utc::now();
    for row in &mut rows {
        row.updated_at = Some(now);
    }

    upsert_all(store, Collection::Standings, &rows, &STANDINGS_CONFLICT_KEY).await?;
    log::info!(
        "Recalculated standings for tournament {} ({} rows, {} completed matches)",
        tournament_id,
        rows.len(),
        matches.len()
    );
    Ok(rows)
}

/// Persisted standings of a tournament, ranked and joined with participant names.
pub async fn load_standings(
    store: &dyn Store,
    tournament_id: TournamentId,
) -> Result<Vec<StandingEntry>, TournamentError> {
    let mut rows: Vec<Standing> = fetch_all(
        store,
        Collection::Standings,
        &Query::new()
            .eq("tournament_id", tournament_id.to_string())
            .order_by("points", false),
    )
    .await?;
    rank_standings(&mut rows);

    let names: HashMap<ParticipantId, String> = list_participants(store, tournament_id, false)
        .await?
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect();

    Ok(rows
        .into_iter()
        .enumerate()
        .map(|(i, standing)| StandingEntry {
            rank: i + 1,
            name: names
                .get(&standing.participant_id)
                .cloned()
                .unwrap_or_else(|| standing.participant_id.to_string()),
            goal_difference: standing.goal_difference(),
            standing,
        })
        .collect())
}

/// Render a ranked table as CSV with a header row.
pub fn standings_csv(entries: &[StandingEntry]) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "rank",
        "participant",
        "played",
        "won",
        "drawn",
        "lost",
        "goals_for",
        "goals_against",
        "goal_difference",
        "points",
    ])?;
    for e in entries {
        let s = &e.standing;
        writer.write_record([
            e.rank.to_string(),
            e.name.clone(),
            s.played.to_string(),
            s.won.to_string(),
            s.drawn.to_string(),
            s.lost.to_string(),
            s.goals_for.to_string(),
            s.goals_against.to_string(),
            e.goal_difference.to_string(),
            s.points.to_string(),
        ])?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
