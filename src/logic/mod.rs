//! Tournament business logic: lifecycle, registration, bracket generation, advancement, consensus.

mod advance;
mod bracket;
mod completion;
mod consensus;
mod entrants;
mod lifecycle;
mod registration;

pub use advance::{advance_round, Advance};
pub use bracket::{bracket_size, generate_bracket, plan_bracket, GeneratedBracket};
pub use completion::{check_completion, total_rounds, tournament_rounds};
pub use consensus::{
    apply_result, cast_vote, match_votes, resolve_as_organizer, AppliedResult, Resolution,
    VoteOutcome,
};
pub use entrants::{collect_entrants, Entrant, EntrantList};
pub use lifecycle::{
    close_registration, create_team, create_tournament, delete_tournament, open_registration,
    start_if_due, tournament_matches,
};
pub use registration::{register_solo, register_team};
