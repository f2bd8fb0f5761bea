//! Tournament, its type and status, and the crate's error type.

use crate::models::game::MatchId;
use crate::models::participant::ParticipantId;
use crate::store::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("Tournament not found")]
    TournamentNotFound(TournamentId),
    #[error("Participant not found")]
    ParticipantNotFound(ParticipantId),
    #[error("Match not found")]
    MatchNotFound(MatchId),
    #[error("Advertisement not found")]
    AdvertisementNotFound(Uuid),
    /// Registration is only open while the tournament is active.
    #[error("Tournament is not open for registration")]
    TournamentClosed,
    #[error("Tournament is full ({max} participants)")]
    TournamentFull { max: u32 },
    #[error("Name must not be empty")]
    EmptyName,
    /// Cancelled matches and matches with an empty side cannot take a result.
    #[error("Match cannot take a result")]
    MatchNotPlayable,
    #[error("Score must be between 0 and {max}")]
    ScoreOutOfRange { max: u32 },
    #[error("Invalid state for this action")]
    InvalidState,
    /// Underlying store call failed; the operation was aborted.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Competition format.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentType {
    /// Round-robin table with standings.
    #[default]
    League,
    Online,
    /// Single-elimination bracket.
    Knockout,
}

impl TournamentType {
    pub fn as_str(self) -> &'static str {
        match self {
            TournamentType::League => "league",
            TournamentType::Online => "online",
            TournamentType::Knockout => "knockout",
        }
    }
}

/// Visibility / progress of a tournament.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Open for registration.
    #[default]
    Active,
    Paused,
    Finished,
    /// Not listed on the public site.
    Hidden,
}

impl TournamentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TournamentStatus::Active => "active",
            TournamentStatus::Paused => "paused",
            TournamentStatus::Finished => "finished",
            TournamentStatus::Hidden => "hidden",
        }
    }
}

/// A tournament as stored in the `tournaments` collection.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TournamentType,
    #[serde(default)]
    pub description: Option<String>,
    pub max_participants: u32,
    #[serde(default)]
    pub status: TournamentStatus,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Admin form for creating a tournament.
#[derive(Clone, Debug, Deserialize)]
pub struct NewTournament {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: TournamentType,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_max_participants")]
    pub max_participants: u32,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

fn default_max_participants() -> u32 {
    16
}

impl Tournament {
    /// Create an active tournament from the admin form. The name is trimmed.
    pub fn new(form: NewTournament) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: form.name.trim().to_string(),
            kind: form.kind,
            description: form
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            max_participants: form.max_participants,
            status: TournamentStatus::Active,
            start_date: form.start_date,
            end_date: form.end_date,
            created_at: Some(Utc::now()),
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == TournamentStatus::Active
    }
}

impl NewTournament {
    pub fn named(name: impl Into<String>, kind: TournamentType, max_participants: u32) -> Self {
        Self {
            name: name.into(),
            kind,
            description: None,
            max_participants,
            start_date: None,
            end_date: None,
        }
    }
}
