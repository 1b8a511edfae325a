//! Round advancer: move winners into the next round once both sibling matches are decided.
//!
//! Propagation is lazy. Nothing exists in round n+1 at a given slot until both of its
//! feeder matches are complete, except for bye entrants placed there at generation.

use crate::error::TournamentError;
use crate::logic::completion::tournament_rounds;
use crate::models::{GameMatch, MatchStatus, Side, Slot, TeamId, TournamentId, TournamentStatus};
use crate::store::Store;

/// What one advancer call did.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Advance {
    /// The sibling match is not decided yet (or not built yet).
    WaitingOnSibling,
    /// The completed match was the final; nothing lies downstream.
    FinalRound,
    /// A next-round match was created.
    Created(GameMatch),
    /// Undetermined sides of an existing next-round match were filled.
    Filled(GameMatch),
    /// The next-round match already held these winners.
    Unchanged,
}

/// Propagate `winner_team_id`, winner of a match in `completed_round`.
///
/// Safe to call any number of times for the same match: later calls change nothing.
pub fn advance_round(
    store: &mut Store,
    tournament_id: TournamentId,
    completed_round: u32,
    winner_team_id: TeamId,
) -> Result<Advance, TournamentError> {
    let rounds = tournament_rounds(store, tournament_id)?;
    let current = store
        .round_matches(tournament_id, completed_round)
        .into_iter()
        .find(|m| m.winner_team_id == Some(winner_team_id))
        .cloned()
        .ok_or_else(|| {
            TournamentError::not_found(
                "Completed match",
                format!("round {} won by {}", completed_round, winner_team_id),
            )
        })?;

    if completed_round >= rounds {
        return Ok(Advance::FinalRound);
    }

    let sibling_winner = match store.match_at(tournament_id, completed_round, current.sibling_slot()) {
        Some(sibling) if sibling.is_completed() => sibling.winner_team_id,
        Some(_) => {
            log::debug!("Match {} waits on sibling slot {}", current.id, current.sibling_slot());
            return Ok(Advance::WaitingOnSibling);
        }
        // a round-1 hole is a bye whose entrant already sits in the parent match
        None if completed_round == 1 => None,
        None => return Ok(Advance::WaitingOnSibling),
    };

    let (from_even, from_odd) = match Side::for_child_slot(current.slot) {
        Side::TeamA => (Some(winner_team_id), sibling_winner),
        Side::TeamB => (sibling_winner, Some(winner_team_id)),
    };
    let team_a = Slot::from(from_even);
    let team_b = Slot::from(from_odd);
    let next_round = completed_round + 1;
    let parent_slot = current.parent_slot();
    let in_progress = store.tournament(tournament_id)?.status == TournamentStatus::InProgress;

    let existing = store
        .match_at(tournament_id, next_round, parent_slot)
        .map(|m| m.id);
    if let Some(parent_id) = existing {
        let parent = store.match_mut(parent_id)?;
        let mut changed = false;
        for (side, incoming) in [(Side::TeamA, team_a), (Side::TeamB, team_b)] {
            changed |= fill_side(parent, side, incoming);
        }
        if !changed {
            return Ok(Advance::Unchanged);
        }
        if in_progress && parent.teams().is_some() {
            parent.promote(MatchStatus::Scheduled);
        }
        log::info!(
            "Filled round {} slot {} of tournament {}: {:?} vs {:?}",
            next_round,
            parent_slot,
            tournament_id,
            parent.team_a,
            parent.team_b
        );
        return Ok(Advance::Filled(parent.clone()));
    }

    if !team_a.is_determined() && !team_b.is_determined() {
        return Ok(Advance::Unchanged);
    }
    let status = if in_progress {
        MatchStatus::Scheduled
    } else {
        MatchStatus::Pending
    };
    let created = store.insert_match(GameMatch::new(
        tournament_id,
        next_round,
        parent_slot,
        team_a,
        team_b,
        status,
    ));
    log::info!(
        "Created round {} slot {} of tournament {}: {:?} vs {:?}",
        next_round,
        parent_slot,
        tournament_id,
        created.team_a,
        created.team_b
    );
    Ok(Advance::Created(created))
}

/// Bind an undetermined side. A side that already holds a team is never overwritten.
fn fill_side(m: &mut GameMatch, side: Side, incoming: Slot) -> bool {
    let Slot::Determined(team) = incoming else {
        return false;
    };
    let slot = m.side_mut(side);
    match *slot {
        Slot::Undetermined => {
            *slot = Slot::Determined(team);
            true
        }
        Slot::Determined(existing) => {
            if existing != team {
                log::warn!(
                    "Match {} already has {} on {:?}; not replacing with {}",
                    m.id,
                    existing,
                    side,
                    team
                );
            }
            false
        }
    }
}
