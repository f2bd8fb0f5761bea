//! Tournament business logic: standings, knockout bracket, registration, results.

mod bracket;
mod matches;
mod participants;
mod site;
mod standings;
mod tournaments;

pub use bracket::{
    bracket_rounds, ensure_knockout_bracket, generate_knockout_bracket, load_bracket,
    persist_bracket, plan_bracket, slots_in_round, BracketPlan,
};
pub use matches::{
    delete_match, get_match, list_matches, record_match_result, schedule_match, NewMatch,
};
pub use participants::{
    approve_participant, approved_participants, get_participant, list_participants,
    register_participant, remove_participant,
};
pub use site::{
    add_advertisement, delete_advertisement, list_advertisements, load_settings, save_settings,
};
pub use standings::{
    calculate_league_standings, compare_standings, compute_standings, load_standings,
    rank_standings, standings_csv, STANDINGS_CONFLICT_KEY,
};
pub use tournaments::{create_tournament, delete_tournament, get_tournament, list_tournaments};
