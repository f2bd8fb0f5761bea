//! Match scheduling and results.

use crate::logic::standings::calculate_league_standings;
use crate::logic::tournaments::get_tournament;
use crate::models::{
    GameMatch, MatchId, MatchStatus, Participant, ParticipantId, TournamentError, TournamentId,
    MAX_SCORE,
};
use crate::store::{fetch_all, fetch_one, insert_one, update_where, Collection, Filter, Query, Store};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Admin form for scheduling a fixture between two approved participants.
#[derive(Clone, Debug, Deserialize)]
pub struct NewMatch {
    pub participant1_id: ParticipantId,
    pub participant2_id: ParticipantId,
    #[serde(default = "default_round")]
    pub round: u32,
    #[serde(default)]
    pub match_date: Option<DateTime<Utc>>,
}

fn default_round() -> u32 {
    1
}

#[derive(Serialize)]
struct ResultPatch {
    participant1_score: u32,
    participant2_score: u32,
    status: MatchStatus,
    match_date: DateTime<Utc>,
}

/// Matches of a tournament by round, then match number.
pub async fn list_matches(
    store: &dyn Store,
    tournament_id: TournamentId,
) -> Result<Vec<GameMatch>, TournamentError> {
    Ok(fetch_all(
        store,
        Collection::Matches,
        &Query::new()
            .eq("tournament_id", tournament_id.to_string())
            .order_by("round", true)
            .order_by("match_number", true),
    )
    .await?)
}

pub async fn get_match(store: &dyn Store, match_id: MatchId) -> Result<GameMatch, TournamentError> {
    fetch_one(store, Collection::Matches, Query::new().eq("id", match_id.to_string()))
        .await?
        .ok_or(TournamentError::MatchNotFound(match_id))
}

/// Schedule a pending match. Both sides must be distinct approved participants of the tournament;
/// the match number continues the round's numbering.
pub async fn schedule_match(
    store: &dyn Store,
    tournament_id: TournamentId,
    form: NewMatch,
) -> Result<GameMatch, TournamentError> {
    get_tournament(store, tournament_id).await?;
    if form.participant1_id == form.participant2_id {
        return Err(TournamentError::MatchNotPlayable);
    }
    for id in [form.participant1_id, form.participant2_id] {
        let participant: Option<Participant> = fetch_one(
            store,
            Collection::Participants,
            Query::new()
                .eq("id", id.to_string())
                .eq("tournament_id", tournament_id.to_string())
                .eq("is_approved", true),
        )
        .await?;
        if participant.is_none() {
            return Err(TournamentError::ParticipantNotFound(id));
        }
    }

    let in_round: Vec<GameMatch> = fetch_all(
        store,
        Collection::Matches,
        &Query::new()
            .eq("tournament_id", tournament_id.to_string())
            .eq("round", form.round),
    )
    .await?;
    let match_number = in_round.iter().map(|m| m.match_number).max().unwrap_or(0) + 1;

    let mut game = GameMatch::new(
        tournament_id,
        Some(form.participant1_id),
        Some(form.participant2_id),
        form.round,
        match_number,
    );
    game.match_date = form.match_date;
    Ok(insert_one(store, Collection::Matches, &game).await?)
}

/// Record the final score, mark the match completed and recompute the standings.
///
/// Scores above [`MAX_SCORE`] are refused before anything is written, as are cancelled
/// matches and matches missing a side (byes, unresolved slots).
/// Re-recording a completed match overwrites its score.
pub async fn record_match_result(
    store: &dyn Store,
    match_id: MatchId,
    participant1_score: u32,
    participant2_score: u32,
) -> Result<GameMatch, TournamentError> {
    if participant1_score > MAX_SCORE || participant2_score > MAX_SCORE {
        return Err(TournamentError::ScoreOutOfRange { max: MAX_SCORE });
    }
    let game = get_match(store, match_id).await?;
    if game.status == MatchStatus::Cancelled
        || game.participant1_id.is_none()
        || game.participant2_id.is_none()
    {
        return Err(TournamentError::MatchNotPlayable);
    }

    let patch = ResultPatch {
        participant1_score,
        participant2_score,
        status: MatchStatus::Completed,
        match_date: game.match_date.unwrap_or_else(Utc::now),
    };
    let updated: Vec<GameMatch> = update_where(
        store,
        Collection::Matches,
        &[Filter::eq("id", match_id.to_string())],
        &patch,
    )
    .await?;
    let game = updated
        .into_iter()
        .next()
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    log::info!(
        "Match {} completed {}-{}",
        game.id,
        game.participant1_score,
        game.participant2_score
    );

    calculate_league_standings(store, game.tournament_id).await?;
    Ok(game)
}

/// Delete a match. Removing a completed match also refreshes the standings.
pub async fn delete_match(store: &dyn Store, match_id: MatchId) -> Result<(), TournamentError> {
    let game = get_match(store, match_id).await?;
    store
        .delete(Collection::Matches, &[Filter::eq("id", match_id.to_string())])
        .await?;
    log::info!("Deleted match {}", match_id);
    if game.is_completed() {
        calculate_league_standings(store, game.tournament_id).await?;
    }
    Ok(())
}
