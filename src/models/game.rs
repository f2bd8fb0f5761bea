//! Match (game) record and its status.

use crate::models::participant::ParticipantId;
use crate::models::tournament::TournamentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Lifecycle of a match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

impl MatchStatus {
    /// Column value used in store filters.
    pub fn as_str(self) -> &'static str {
        match self {
            MatchStatus::Pending => "pending",
            MatchStatus::Completed => "completed",
            MatchStatus::Cancelled => "cancelled",
        }
    }
}

/// Highest score a single side can be credited with in one match.
pub const MAX_SCORE: u32 = u16::MAX as u32;

/// A single 1v1 match between two participant slots.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    /// None for a bye or an unresolved earlier round.
    pub participant1_id: Option<ParticipantId>,
    pub participant2_id: Option<ParticipantId>,
    #[serde(default)]
    pub participant1_score: u32,
    #[serde(default)]
    pub participant2_score: u32,
    pub round: u32,
    pub match_number: u32,
    #[serde(default)]
    pub status: MatchStatus,
    #[serde(default)]
    pub match_date: Option<DateTime<Utc>>,
}

impl GameMatch {
    /// A pending 0-0 match in the given round.
    pub fn new(
        tournament_id: TournamentId,
        participant1_id: Option<ParticipantId>,
        participant2_id: Option<ParticipantId>,
        round: u32,
        match_number: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            participant1_id,
            participant2_id,
            participant1_score: 0,
            participant2_score: 0,
            round,
            match_number,
            status: MatchStatus::Pending,
            match_date: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    /// True when exactly one side is assigned.
    pub fn is_bye(&self) -> bool {
        self.participant1_id.is_some() != self.participant2_id.is_some()
    }
}
