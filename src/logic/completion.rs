//! Completion check: the tournament is over once its final-round match is decided.

use crate::error::TournamentError;
use crate::models::{TournamentId, TournamentStatus};
use crate::notify::{best_effort, Notifier};
use crate::store::Store;
use chrono::{DateTime, Utc};

/// Rounds in a single-elimination bracket for `bracket_max_teams` entrants.
///
/// The count is padded to the next power of two; `default_size` stands in when unset.
pub fn total_rounds(bracket_max_teams: Option<u32>, default_size: u32) -> u32 {
    let slots = bracket_max_teams
        .unwrap_or(default_size)
        .max(2)
        .next_power_of_two();
    slots.trailing_zeros()
}

/// Total rounds for a stored tournament.
pub fn tournament_rounds(store: &Store, tournament_id: TournamentId) -> Result<u32, TournamentError> {
    let t = store.tournament(tournament_id)?;
    Ok(total_rounds(t.bracket_max_teams, store.default_bracket_size()))
}

/// Mark the tournament completed if `completed_round` is the final round.
///
/// Returns true only for the call that performed the transition.
pub fn check_completion(
    store: &mut Store,
    tournament_id: TournamentId,
    completed_round: u32,
    now: DateTime<Utc>,
    notifier: &dyn Notifier,
) -> Result<bool, TournamentError> {
    let rounds = tournament_rounds(store, tournament_id)?;
    let tournament = store.tournament_mut(tournament_id)?;
    if completed_round != rounds || tournament.status == TournamentStatus::Completed {
        return Ok(false);
    }
    tournament.advance_status(TournamentStatus::Completed)?;
    if tournament.end_date.is_none() {
        tournament.end_date = Some(now);
    }
    best_effort("tournament completed", notifier.tournament_completed(tournament));
    Ok(true)
}
