//! Data structures for the tournament manager: tournaments, participants, matches, standings, bracket.

mod bracket;
mod game;
mod participant;
mod site;
mod standing;
mod tournament;

pub use bracket::{BracketMatch, BracketRound, BracketSlot, BracketSlotId};
pub use game::{GameMatch, MatchId, MatchStatus, MAX_SCORE};
pub use participant::{Participant, ParticipantId, Registration};
pub use site::{Advertisement, NewAdvertisement, Settings, SettingsUpdate};
pub use standing::{Standing, StandingEntry, POINTS_FOR_DRAW, POINTS_FOR_WIN};
pub use tournament::{
    NewTournament, Tournament, TournamentError, TournamentId, TournamentStatus, TournamentType,
};
