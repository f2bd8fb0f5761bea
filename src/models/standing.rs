//! League table row.

use crate::models::participant::ParticipantId;
use crate::models::tournament::TournamentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Points for a win.
pub const POINTS_FOR_WIN: u32 = 3;
/// Points for a draw.
pub const POINTS_FOR_DRAW: u32 = 1;

/// Derived per (tournament, participant) summary. Rebuilt from scratch on every recalculation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub tournament_id: TournamentId,
    pub participant_id: ParticipantId,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub points: u32,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Standing {
    /// Zero row for a participant.
    pub fn new(tournament_id: TournamentId, participant_id: ParticipantId) -> Self {
        Self {
            tournament_id,
            participant_id,
            played: 0,
            won: 0,
            drawn: 0,
            lost: 0,
            goals_for: 0,
            goals_against: 0,
            points: 0,
            updated_at: None,
        }
    }

    pub fn goal_difference(&self) -> i64 {
        i64::from(self.goals_for) - i64::from(self.goals_against)
    }

    /// Count one played match with the given score (own goals first). Totals saturate.
    pub fn record(&mut self, scored: u32, conceded: u32) {
        self.played = self.played.saturating_add(1);
        self.goals_for = self.goals_for.saturating_add(scored);
        self.goals_against = self.goals_against.saturating_add(conceded);
        match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => {
                self.won = self.won.saturating_add(1);
                self.points = self.points.saturating_add(POINTS_FOR_WIN);
            }
            std::cmp::Ordering::Less => self.lost = self.lost.saturating_add(1),
            std::cmp::Ordering::Equal => {
                self.drawn = self.drawn.saturating_add(1);
                self.points = self.points.saturating_add(POINTS_FOR_DRAW);
            }
        }
    }
}

/// A standing joined with the participant's display name (API / CSV view).
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct StandingEntry {
    pub rank: usize,
    pub name: String,
    pub goal_difference: i64,
    #[serde(flatten)]
    pub standing: Standing,
}
