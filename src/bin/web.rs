//! Web server: JSON API for the public registration site and the admin panel.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! Set STORE_URL and STORE_KEY to use the hosted database; otherwise data lives in memory.

use actix_files::Files;
use actix_web::{
    delete, get, post, put,
    web::{self, Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use fifa_tournament_web::{
    add_advertisement, approve_participant, calculate_league_standings, create_tournament,
    delete_advertisement, delete_match, delete_tournament, ensure_knockout_bracket, get_tournament,
    list_advertisements, list_matches, list_participants, list_tournaments, load_bracket,
    load_settings, load_standings, record_match_result, register_participant, remove_participant,
    save_settings, schedule_match, standings_csv, Config, NewAdvertisement, NewMatch,
    NewTournament, Registration, SettingsUpdate, Store, StoreError, TournamentError,
    TournamentId, TournamentType,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Shared store handle; every handler passes it explicitly to the library.
type AppState = Data<dyn Store>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct TournamentListQuery {
    #[serde(rename = "type")]
    kind: Option<TournamentType>,
}

#[derive(Deserialize)]
struct ParticipantListQuery {
    #[serde(default)]
    approved: bool,
}

#[derive(Deserialize)]
struct AdvertisementListQuery {
    #[serde(default)]
    active: bool,
}

#[derive(Deserialize)]
struct MatchResultBody {
    participant1_score: u32,
    participant2_score: u32,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segment: participant, match or advertisement id.
#[derive(Deserialize)]
struct RecordPath {
    id: Uuid,
}

/// Map a library error to a JSON error response. Store failures are logged and hidden.
fn error_response(e: TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match &e {
        TournamentError::TournamentNotFound(_)
        | TournamentError::ParticipantNotFound(_)
        | TournamentError::MatchNotFound(_)
        | TournamentError::AdvertisementNotFound(_)
        | TournamentError::Store(StoreError::NotFound) => HttpResponse::NotFound().json(body),
        TournamentError::TournamentFull { .. } | TournamentError::Store(StoreError::Conflict(_)) => {
            HttpResponse::Conflict().json(body)
        }
        TournamentError::TournamentClosed
        | TournamentError::EmptyName
        | TournamentError::MatchNotPlayable
        | TournamentError::ScoreOutOfRange { .. }
        | TournamentError::InvalidState => HttpResponse::BadRequest().json(body),
        TournamentError::Store(err) => {
            log::error!("Store failure: {}", err);
            HttpResponse::BadGateway().json(serde_json::json!({ "error": "Database error" }))
        }
    }
}

fn respond<T: Serialize>(result: Result<T, TournamentError>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => error_response(e),
    }
}

/// 204 on success; deletes have no body.
fn respond_deleted(result: Result<(), TournamentError>) -> HttpResponse {
    match result {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "fifa-tournament-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// List visible tournaments, newest first (`?type=league|online|knockout`).
#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState, query: Query<TournamentListQuery>) -> HttpResponse {
    respond(list_tournaments(state.get_ref(), query.kind).await)
}

#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<NewTournament>) -> HttpResponse {
    respond(create_tournament(state.get_ref(), body.into_inner()).await)
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(get_tournament(state.get_ref(), path.id).await)
}

/// Delete a tournament with its participants, matches, standings and bracket.
#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond_deleted(delete_tournament(state.get_ref(), path.id).await)
}

/// List participants (`?approved=true` for the approved roster only).
#[get("/api/tournaments/{id}/participants")]
async fn api_list_participants(
    state: AppState,
    path: Path<TournamentPath>,
    query: Query<ParticipantListQuery>,
) -> HttpResponse {
    respond(list_participants(state.get_ref(), path.id, query.approved).await)
}

/// Public registration form.
#[post("/api/tournaments/{id}/participants")]
async fn api_register_participant(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<Registration>,
) -> HttpResponse {
    respond(register_participant(state.get_ref(), path.id, body.into_inner()).await)
}

#[post("/api/participants/{id}/approve")]
async fn api_approve_participant(state: AppState, path: Path<RecordPath>) -> HttpResponse {
    respond(approve_participant(state.get_ref(), path.id).await)
}

/// Reject a registrant or delete a participant.
#[delete("/api/participants/{id}")]
async fn api_remove_participant(state: AppState, path: Path<RecordPath>) -> HttpResponse {
    respond_deleted(remove_participant(state.get_ref(), path.id).await)
}

#[get("/api/tournaments/{id}/matches")]
async fn api_list_matches(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(list_matches(state.get_ref(), path.id).await)
}

#[post("/api/tournaments/{id}/matches")]
async fn api_schedule_match(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<NewMatch>,
) -> HttpResponse {
    respond(schedule_match(state.get_ref(), path.id, body.into_inner()).await)
}

/// Record a final score; the match becomes completed and standings are recomputed.
#[put("/api/matches/{id}/result")]
async fn api_record_match_result(
    state: AppState,
    path: Path<RecordPath>,
    body: Json<MatchResultBody>,
) -> HttpResponse {
    respond(
        record_match_result(
            state.get_ref(),
            path.id,
            body.participant1_score,
            body.participant2_score,
        )
        .await,
    )
}

#[delete("/api/matches/{id}")]
async fn api_delete_match(state: AppState, path: Path<RecordPath>) -> HttpResponse {
    respond_deleted(delete_match(state.get_ref(), path.id).await)
}

#[post("/api/tournaments/{id}/standings/recalculate")]
async fn api_recalculate_standings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(calculate_league_standings(state.get_ref(), path.id).await)
}

/// Ranked league table with participant names.
#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(load_standings(state.get_ref(), path.id).await)
}

#[get("/api/tournaments/{id}/standings.csv")]
async fn api_standings_csv(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let entries = match load_standings(state.get_ref(), path.id).await {
        Ok(entries) => entries,
        Err(e) => return error_response(e),
    };
    match standings_csv(&entries) {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                "Content-Disposition",
                format!("attachment; filename=\"standings-{}.csv\"", path.id),
            ))
            .body(csv),
        Err(e) => {
            log::error!("CSV export failed: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({ "error": "Export failed" }))
        }
    }
}

/// Generate the knockout bracket if the tournament has no matches yet; returns the slots.
#[post("/api/tournaments/{id}/bracket")]
async fn api_ensure_bracket(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(ensure_knockout_bracket(state.get_ref(), path.id).await)
}

/// Matches grouped by round.
#[get("/api/tournaments/{id}/bracket")]
async fn api_bracket(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(load_bracket(state.get_ref(), path.id).await)
}

#[get("/api/advertisements")]
async fn api_list_advertisements(state: AppState, query: Query<AdvertisementListQuery>) -> HttpResponse {
    respond(list_advertisements(state.get_ref(), query.active).await)
}

#[post("/api/advertisements")]
async fn api_add_advertisement(state: AppState, body: Json<NewAdvertisement>) -> HttpResponse {
    respond(add_advertisement(state.get_ref(), body.into_inner()).await)
}

#[delete("/api/advertisements/{id}")]
async fn api_delete_advertisement(state: AppState, path: Path<RecordPath>) -> HttpResponse {
    respond_deleted(delete_advertisement(state.get_ref(), path.id).await)
}

#[get("/api/settings")]
async fn api_settings(state: AppState) -> HttpResponse {
    respond(load_settings(state.get_ref()).await)
}

#[put("/api/settings")]
async fn api_save_settings(state: AppState, body: Json<SettingsUpdate>) -> HttpResponse {
    respond(save_settings(state.get_ref(), body.into_inner()).await)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    let store = config.build_store().map_err(std::io::Error::other)?;
    let state: AppState = Data::from(store);

    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let static_dir = config.static_dir.clone();
    if !static_dir.is_dir() {
        log::warn!("Static directory {} not found, /static is disabled", static_dir.display());
    }

    HttpServer::new(move || {
        let static_dir = static_dir.clone();
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(favicon)
            .service(api_list_tournaments)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_delete_tournament)
            .service(api_list_participants)
            .service(api_register_participant)
            .service(api_approve_participant)
            .service(api_remove_participant)
            .service(api_list_matches)
            .service(api_schedule_match)
            .service(api_record_match_result)
            .service(api_delete_match)
            .service(api_recalculate_standings)
            .service(api_standings_csv)
            .service(api_standings)
            .service(api_ensure_bracket)
            .service(api_bracket)
            .service(api_list_advertisements)
            .service(api_add_advertisement)
            .service(api_delete_advertisement)
            .service(api_settings)
            .service(api_save_settings)
            .configure(move |cfg: &mut web::ServiceConfig| {
                if static_dir.is_dir() {
                    cfg.service(Files::new("/static", &static_dir));
                }
            })
    })
    .bind(bind)?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn missing_records_map_to_not_found() {
        for e in [
            TournamentError::TournamentNotFound(Uuid::new_v4()),
            TournamentError::ParticipantNotFound(Uuid::new_v4()),
            TournamentError::MatchNotFound(Uuid::new_v4()),
            TournamentError::AdvertisementNotFound(Uuid::new_v4()),
            TournamentError::Store(StoreError::NotFound),
        ] {
            assert_eq!(error_response(e).status(), StatusCode::NOT_FOUND);
        }
    }

    #[test]
    fn capacity_and_conflicts_map_to_conflict() {
        assert_eq!(
            error_response(TournamentError::TournamentFull { max: 8 }).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            error_response(TournamentError::Store(StoreError::Conflict("duplicate id".into()))).status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn validation_failures_map_to_bad_request() {
        for e in [
            TournamentError::TournamentClosed,
            TournamentError::EmptyName,
            TournamentError::MatchNotPlayable,
            TournamentError::ScoreOutOfRange { max: 65535 },
            TournamentError::InvalidState,
        ] {
            assert_eq!(error_response(e).status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn store_failures_map_to_bad_gateway() {
        let e = TournamentError::Store(StoreError::Unavailable("connection refused".into()));
        assert_eq!(error_response(e).status(), StatusCode::BAD_GATEWAY);
        let e = TournamentError::Store(StoreError::Rejected {
            status: 500,
            message: "boom".into(),
        });
        assert_eq!(error_response(e).status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn deletes_answer_without_a_body() {
        assert_eq!(respond_deleted(Ok(())).status(), StatusCode::NO_CONTENT);
        let missing = respond_deleted(Err(TournamentError::MatchNotFound(Uuid::new_v4())));
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}
