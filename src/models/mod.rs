//! Data structures for bracket tournaments: tournaments, teams, matches, votes, registrations.

mod game;
mod registration;
mod team;
mod tournament;
mod vote;

pub use game::{GameMatch, MatchId, MatchStatus, Side, Slot};
pub use registration::{Registrant, TournamentRegistration};
pub use team::{Team, TeamId, TeamMember, UserId};
pub use tournament::{Tournament, TournamentId, TournamentSettings, TournamentStatus};
pub use vote::{MatchResultVote, VoteTally};
