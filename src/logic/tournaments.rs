//! Tournament lifecycle: create, list, look up, delete.

use crate::models::{NewTournament, Tournament, TournamentError, TournamentId, TournamentStatus, TournamentType};
use crate::store::{fetch_all, fetch_one, insert_one, Collection, Filter, Query, Store};

/// Create an active tournament. Names must not be blank.
pub async fn create_tournament(
    store: &dyn Store,
    form: NewTournament,
) -> Result<Tournament, TournamentError> {
    if form.name.trim().is_empty() {
        return Err(TournamentError::EmptyName);
    }
    let tournament = insert_one(store, Collection::Tournaments, &Tournament::new(form)).await?;
    log::info!("Created {} tournament {} ({})", tournament.kind.as_str(), tournament.name, tournament.id);
    Ok(tournament)
}

/// Publicly visible tournaments (everything but hidden), newest first.
pub async fn list_tournaments(
    store: &dyn Store,
    kind: Option<TournamentType>,
) -> Result<Vec<Tournament>, TournamentError> {
    let mut query = Query::new().neq("status", TournamentStatus::Hidden.as_str());
    if let Some(kind) = kind {
        query = query.eq("type", kind.as_str());
    }
    Ok(fetch_all(store, Collection::Tournaments, &query.order_by("created_at", false)).await?)
}

pub async fn get_tournament(
    store: &dyn Store,
    tournament_id: TournamentId,
) -> Result<Tournament, TournamentError> {
    fetch_one(
        store,
        Collection::Tournaments,
        Query::new().eq("id", tournament_id.to_string()),
    )
    .await?
    .ok_or(TournamentError::TournamentNotFound(tournament_id))
}

/// Delete a tournament and everything that belongs to it.
pub async fn delete_tournament(
    store: &dyn Store,
    tournament_id: TournamentId,
) -> Result<(), TournamentError> {
    let tournament = get_tournament(store, tournament_id).await?;
    let by_tournament = [Filter::eq("tournament_id", tournament_id.to_string())];
    for collection in [
        Collection::Bracket,
        Collection::Standings,
        Collection::Matches,
        Collection::Participants,
    ] {
        store.delete(collection, &by_tournament).await?;
    }
    store
        .delete(
            Collection::Tournaments,
            &[Filter::eq("id", tournament_id.to_string())],
        )
        .await?;
    log::info!("Deleted tournament {} ({})", tournament.name, tournament.id);
    Ok(())
}
