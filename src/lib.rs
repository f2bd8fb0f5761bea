//! FIFA tournament manager: library with models, store access and business logic.

pub mod config;
pub mod logic;
pub mod models;
pub mod store;

pub use config::Config;
pub use logic::{
    add_advertisement, approve_participant, approved_participants, bracket_rounds,
    calculate_league_standings, compare_standings, compute_standings, create_tournament,
    delete_advertisement, delete_match, delete_tournament, ensure_knockout_bracket,
    generate_knockout_bracket, get_match, get_participant, get_tournament, list_advertisements,
    list_matches, list_participants, list_tournaments, load_bracket, load_settings,
    load_standings, persist_bracket, plan_bracket, rank_standings, record_match_result,
    register_participant, remove_participant, save_settings, schedule_match, slots_in_round,
    standings_csv, BracketPlan, NewMatch, STANDINGS_CONFLICT_KEY,
};
pub use models::{
    Advertisement, BracketMatch, BracketRound, BracketSlot, BracketSlotId, GameMatch, MatchId, MatchStatus,
    NewAdvertisement, NewTournament, Participant, ParticipantId, Registration, Settings,
    SettingsUpdate, Standing, StandingEntry, Tournament, TournamentError, TournamentId,
    TournamentStatus, TournamentType, MAX_SCORE, POINTS_FOR_DRAW, POINTS_FOR_WIN,
};
pub use store::{Collection, MemoryStore, RestStore, Store, StoreError};
