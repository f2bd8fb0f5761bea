//! Knockout bracket: single-elimination skeleton with round-1 matches and later-round placeholders.

use crate::logic::participants::{approved_participants, list_participants};
use crate::logic::tournaments::get_tournament;
use crate::models::{
    BracketMatch, BracketRound, BracketSlot, GameMatch, Participant, ParticipantId, TournamentError,
    TournamentId, TournamentType,
};
use crate::store::{fetch_all, fetch_one, insert_one, Collection, Query, Store};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

/// Rounds needed for `participants` entrants: ceil(log2(n)), and 0 for n <= 1.
pub fn bracket_rounds(participants: usize) -> u32 {
    if participants <= 1 {
        0
    } else {
        (participants - 1).ilog2() + 1
    }
}

/// Slots in `round` (1-based) of a bracket with `rounds` rounds: 2^(rounds - round).
pub fn slots_in_round(rounds: u32, round: u32) -> usize {
    1usize << (rounds - round)
}

/// Seeding decided before anything is written.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BracketPlan {
    pub rounds: u32,
    /// Round-1 pairings by slot. A `None` side is a bye.
    pub first_round: Vec<(Option<ParticipantId>, Option<ParticipantId>)>,
}

/// Shuffle the participants (uniform Fisher-Yates) and pair slot i with shuffled
/// positions 2i and 2i+1.
pub fn plan_bracket<R: Rng + ?Sized>(participants: &[Participant], rng: &mut R) -> BracketPlan {
    let mut ids: Vec<ParticipantId> = participants.iter().map(|p| p.id).collect();
    ids.shuffle(rng);

    let rounds = bracket_rounds(ids.len());
    let first_round = if rounds == 0 {
        Vec::new()
    } else {
        (0..slots_in_round(rounds, 1))
            .map(|i| (ids.get(2 * i).copied(), ids.get(2 * i + 1).copied()))
            .collect()
    };
    BracketPlan { rounds, first_round }
}

/// Write the plan: a pending match plus a slot for every round-1 cell, then empty
/// placeholder slots for every later round. Returns the slots in creation order.
///
/// Writes are sequential and not rolled back: a failure leaves earlier records in place.
pub async fn persist_bracket(
    store: &dyn Store,
    tournament_id: TournamentId,
    plan: &BracketPlan,
) -> Result<Vec<BracketSlot>, TournamentError> {
    let mut created = Vec::new();
    for round in 1..=plan.rounds {
        for position in 0..slots_in_round(plan.rounds, round) {
            let position = position as u32;
            let match_id = if round == 1 {
                let (p1, p2) = plan.first_round[position as usize];
                let game = GameMatch::new(tournament_id, p1, p2, round, position + 1);
                let game = insert_one(store, Collection::Matches, &game).await?;
                Some(game.id)
            } else {
                None
            };
            let slot = BracketSlot::new(tournament_id, round, position, match_id);
            created.push(insert_one(store, Collection::Bracket, &slot).await?);
        }
    }
    Ok(created)
}

/// Generate a bracket for the tournament's approved participants.
///
/// No approved participants: returns an empty list and writes nothing. One participant:
/// zero rounds, also empty.
pub async fn generate_knockout_bracket(
    store: &dyn Store,
    tournament_id: TournamentId,
) -> Result<Vec<BracketSlot>, TournamentError> {
    let participants = approved_participants(store, tournament_id).await?;
    if participants.is_empty() {
        return Ok(Vec::new());
    }
    let plan = {
        let mut rng = rand::thread_rng();
        plan_bracket(&participants, &mut rng)
    };
    let slots = persist_bracket(store, tournament_id, &plan).await?;
    log::info!(
        "Generated bracket for tournament {}: {} participants, {} rounds, {} slots",
        tournament_id,
        participants.len(),
        plan.rounds,
        slots.len()
    );
    Ok(slots)
}

/// Generate the bracket only if the knockout tournament has no matches yet; otherwise
/// return the existing slots ordered by round and position.
pub async fn ensure_knockout_bracket(
    store: &dyn Store,
    tournament_id: TournamentId,
) -> Result<Vec<BracketSlot>, TournamentError> {
    let tournament = get_tournament(store, tournament_id).await?;
    if tournament.kind != TournamentType::Knockout {
        return Err(TournamentError::InvalidState);
    }
    let existing: Option<GameMatch> = fetch_one(
        store,
        Collection::Matches,
        Query::new().eq("tournament_id", tournament_id.to_string()),
    )
    .await?;
    if existing.is_some() {
        return Ok(fetch_all(
            store,
            Collection::Bracket,
            &Query::new()
                .eq("tournament_id", tournament_id.to_string())
                .order_by("round", true)
                .order_by("position", true),
        )
        .await?);
    }
    generate_knockout_bracket(store, tournament_id).await
}

/// Matches of a tournament grouped by round, ascending, with participant names.
pub async fn load_bracket(
    store: &dyn Store,
    tournament_id: TournamentId,
) -> Result<Vec<BracketRound>, TournamentError> {
    let matches: Vec<GameMatch> = fetch_all(
        store,
        Collection::Matches,
        &Query::new()
            .eq("tournament_id", tournament_id.to_string())
            .order_by("round", true)
            .order_by("match_number", true),
    )
    .await?;

    let names: HashMap<ParticipantId, String> = list_participants(store, tournament_id, false)
        .await?
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect();
    let name_of = |id: Option<ParticipantId>| id.and_then(|id| names.get(&id).cloned());

    let mut rounds: Vec<BracketRound> = Vec::new();
    for m in matches {
        let entry = BracketMatch {
            participant1_name: name_of(m.participant1_id),
            participant2_name: name_of(m.participant2_id),
            game: m,
        };
        match rounds.last_mut() {
            Some(r) if r.round == entry.game.round => r.matches.push(entry),
            _ => rounds.push(BracketRound {
                round: entry.game.round,
                matches: vec![entry],
            }),
        }
    }
    Ok(rounds)
}
