//! Participant (registrant) data structure.

use crate::models::tournament::TournamentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a participant (used in matches and standings).
pub type ParticipantId = Uuid;

/// A registrant for one tournament. Only approved participants are scheduled or ranked.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub tournament_id: TournamentId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Console or platform the participant plays on (e.g. "PS5").
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub is_approved: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Registration form submitted from the public site.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Registration {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
}

impl Participant {
    /// Create an unapproved participant from a registration. The name is trimmed.
    pub fn new(tournament_id: TournamentId, registration: Registration) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            name: registration.name.trim().to_string(),
            email: non_empty(registration.email),
            phone: non_empty(registration.phone),
            platform: non_empty(registration.platform),
            is_approved: false,
            created_at: Some(Utc::now()),
        }
    }

    /// Shorthand for an already approved participant with only a name.
    pub fn approved(tournament_id: TournamentId, name: impl Into<String>) -> Self {
        Self {
            is_approved: true,
            ..Self::new(
                tournament_id,
                Registration {
                    name: name.into(),
                    ..Registration::default()
                },
            )
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
