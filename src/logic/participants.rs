//! Registration and approval of participants.

use crate::logic::standings::calculate_league_standings;
use crate::logic::tournaments::get_tournament;
use crate::models::{Participant, ParticipantId, Registration, TournamentError, TournamentId};
use crate::store::{fetch_all, fetch_one, insert_one, update_where, Collection, Filter, Query, Store};
use serde_json::json;

/// Approved participants of a tournament in registration order.
pub async fn approved_participants(
    store: &dyn Store,
    tournament_id: TournamentId,
) -> Result<Vec<Participant>, TournamentError> {
    list_participants(store, tournament_id, true).await
}

pub async fn list_participants(
    store: &dyn Store,
    tournament_id: TournamentId,
    approved_only: bool,
) -> Result<Vec<Participant>, TournamentError> {
    let mut query = Query::new().eq("tournament_id", tournament_id.to_string());
    if approved_only {
        query = query.eq("is_approved", true);
    }
    Ok(fetch_all(store, Collection::Participants, &query.order_by("created_at", true)).await?)
}

pub async fn get_participant(
    store: &dyn Store,
    participant_id: ParticipantId,
) -> Result<Participant, TournamentError> {
    fetch_one(
        store,
        Collection::Participants,
        Query::new().eq("id", participant_id.to_string()),
    )
    .await?
    .ok_or(TournamentError::ParticipantNotFound(participant_id))
}

/// Register for an active tournament. The participant starts unapproved.
///
/// Fails with `TournamentClosed` unless the tournament is active, `EmptyName` for a blank
/// name, and `TournamentFull` once the approved roster has reached `max_participants`.
pub async fn register_participant(
    store: &dyn Store,
    tournament_id: TournamentId,
    registration: Registration,
) -> Result<Participant, TournamentError> {
    let tournament = get_tournament(store, tournament_id).await?;
    if !tournament.is_open() {
        return Err(TournamentError::TournamentClosed);
    }
    if registration.name.trim().is_empty() {
        return Err(TournamentError::EmptyName);
    }
    let approved = approved_participants(store, tournament_id).await?.len();
    if approved >= tournament.max_participants as usize {
        return Err(TournamentError::TournamentFull {
            max: tournament.max_participants,
        });
    }

    let participant = Participant::new(tournament_id, registration);
    let stored = insert_one(store, Collection::Participants, &participant).await?;
    log::info!("Registered {} for tournament {}", stored.name, tournament_id);
    Ok(stored)
}

/// Accept a registrant and recompute the tournament's standings so the new participant
/// appears with a zero row. Approving an already approved participant is a no-op.
pub async fn approve_participant(
    store: &dyn Store,
    participant_id: ParticipantId,
) -> Result<Participant, TournamentError> {
    let participant = get_participant(store, participant_id).await?;
    if participant.is_approved {
        return Ok(participant);
    }
    let tournament = get_tournament(store, participant.tournament_id).await?;
    let approved = approved_participants(store, tournament.id).await?.len();
    if approved >= tournament.max_participants as usize {
        return Err(TournamentError::TournamentFull {
            max: tournament.max_participants,
        });
    }

    let updated: Vec<Participant> = update_where(
        store,
        Collection::Participants,
        &[Filter::eq("id", participant_id.to_string())],
        &json!({ "is_approved": true }),
    )
    .await?;
    let participant = updated
        .into_iter()
        .next()
        .ok_or(TournamentError::ParticipantNotFound(participant_id))?;
    log::info!("Approved participant {} ({})", participant.name, participant.id);

    calculate_league_standings(store, participant.tournament_id).await?;
    Ok(participant)
}

/// Reject a registrant or delete a participant, along with their standings row.
pub async fn remove_participant(
    store: &dyn Store,
    participant_id: ParticipantId,
) -> Result<(), TournamentError> {
    let participant = get_participant(store, participant_id).await?;
    store
        .delete(
            Collection::Participants,
            &[Filter::eq("id", participant_id.to_string())],
        )
        .await?;
    store
        .delete(
            Collection::Standings,
            &[
                Filter::eq("tournament_id", participant.tournament_id.to_string()),
                Filter::eq("participant_id", participant_id.to_string()),
            ],
        )
        .await?;
    log::info!("Removed participant {} ({})", participant.name, participant.id);
    Ok(())
}
