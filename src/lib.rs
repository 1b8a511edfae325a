//! Bracket tournament web app: library with models, storage and business logic.

pub mod config;
pub mod context;
pub mod error;
pub mod logic;
pub mod models;
pub mod notify;
pub mod store;

pub use config::AppConfig;
pub use context::RequestContext;
pub use error::TournamentError;
pub use logic::{
    advance_round, apply_result, bracket_size, cast_vote, check_completion, close_registration,
    collect_entrants, create_team, create_tournament, delete_tournament, generate_bracket,
    match_votes, open_registration, plan_bracket, register_solo, register_team,
    resolve_as_organizer, start_if_due, total_rounds, tournament_matches, tournament_rounds,
    Advance, AppliedResult, Entrant, EntrantList, GeneratedBracket, Resolution, VoteOutcome,
};
pub use models::{
    GameMatch, MatchId, MatchResultVote, MatchStatus, Registrant, Side, Slot, Team, TeamId,
    TeamMember, Tournament, TournamentId, TournamentRegistration, TournamentSettings,
    TournamentStatus, UserId, VoteTally,
};
pub use notify::{LogNotifier, Notifier, NotifyError, RecordingNotifier, Signal};
pub use store::Store;
