//! Knockout bracket cells.

use crate::models::game::{GameMatch, MatchId};
use crate::models::tournament::TournamentId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a bracket slot.
pub type BracketSlotId = Uuid;

/// One (tournament, round, position) cell of a single-elimination bracket.
/// Round 1 slots point at a concrete match; later rounds are empty placeholders.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketSlot {
    pub id: BracketSlotId,
    pub tournament_id: TournamentId,
    pub round: u32,
    /// Zero-based index within the round.
    pub position: u32,
    #[serde(default)]
    pub match_id: Option<MatchId>,
}

impl BracketSlot {
    pub fn new(tournament_id: TournamentId, round: u32, position: u32, match_id: Option<MatchId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            round,
            position,
            match_id,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.match_id.is_none()
    }
}

/// A match joined with the names of its participants. Empty sides have no name.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct BracketMatch {
    pub participant1_name: Option<String>,
    pub participant2_name: Option<String>,
    #[serde(flatten)]
    pub game: GameMatch,
}

/// Matches of one round, for bracket display.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct BracketRound {
    pub round: u32,
    pub matches: Vec<BracketMatch>,
}
