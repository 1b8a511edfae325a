//! Bracket generation: random seeding, byes, round-1 pairings and bye-driven round-2 matches.

use crate::error::TournamentError;
use crate::logic::entrants::Entrant;
use crate::models::{GameMatch, MatchStatus, Slot, TeamId, TournamentId};
use crate::store::Store;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::collections::HashSet;

/// Matches created for a new bracket and the entrants that skip round 1.
#[derive(Clone, Debug, Serialize)]
pub struct GeneratedBracket {
    pub matches: Vec<GameMatch>,
    pub immediate_winners: Vec<TeamId>,
}

/// Smallest power of two that holds `entrants`.
pub fn bracket_size(entrants: usize) -> usize {
    entrants.max(2).next_power_of_two()
}

/// Lay out the bracket without touching storage.
///
/// 1. Shuffle entrants (the only seeding policy).
/// 2. Pad to a power of two; the first `byes` slot pairs each get one entrant, the rest two.
/// 3. Full pairs become round-1 matches; lone entrants are immediate winners.
/// 4. Immediate winners pair up into round-2 matches at their parent slot. An odd leftover
///    is placed as team A of its parent with team B undetermined, waiting on its sibling.
pub fn plan_bracket<R: Rng + ?Sized>(
    tournament_id: TournamentId,
    entrants: &[Entrant],
    rng: &mut R,
) -> Result<GeneratedBracket, TournamentError> {
    let n = entrants.len();
    if n < 2 {
        return Err(TournamentError::validation(format!(
            "Need at least 2 entrants to build a bracket (have {})",
            n
        )));
    }
    let mut seen = HashSet::with_capacity(n);
    if let Some(dup) = entrants.iter().find(|e| !seen.insert(e.team_id)) {
        return Err(TournamentError::validation(format!(
            "Entrant {} appears more than once",
            dup.team_id
        )));
    }

    let mut seeded: Vec<TeamId> = entrants.iter().map(|e| e.team_id).collect();
    seeded.shuffle(rng);

    let size = bracket_size(n);
    let byes = size - n;
    let mut order = seeded.into_iter();
    let mut slots: Vec<Option<TeamId>> = Vec::with_capacity(size);
    for pair in 0..size / 2 {
        slots.push(order.next());
        slots.push(if pair < byes { None } else { order.next() });
    }

    let mut matches = Vec::new();
    // (pair index, team) for every entrant that skips round 1
    let mut byes_by_pair: Vec<(u32, TeamId)> = Vec::with_capacity(byes);
    for (pair, two) in (0u32..).zip(slots.chunks_exact(2)) {
        match (two[0], two[1]) {
            (Some(a), Some(b)) => matches.push(GameMatch::new(
                tournament_id,
                1,
                pair,
                Slot::Determined(a),
                Slot::Determined(b),
                MatchStatus::Pending,
            )),
            (Some(t), None) | (None, Some(t)) => byes_by_pair.push((pair, t)),
            (None, None) => {
                return Err(TournamentError::validation(format!(
                    "Bracket layout left slot pair {} empty",
                    pair
                )))
            }
        }
    }

    for chunk in byes_by_pair.chunks(2) {
        let (pair, first) = chunk[0];
        let second = chunk.get(1).map(|&(_, t)| t);
        matches.push(GameMatch::new(
            tournament_id,
            2,
            pair / 2,
            Slot::Determined(first),
            Slot::from(second),
            MatchStatus::Pending,
        ));
    }

    log::debug!(
        "Planned bracket for {}: {} entrants, size {}, {} byes, {} matches",
        tournament_id,
        n,
        size,
        byes,
        matches.len()
    );

    Ok(GeneratedBracket {
        matches,
        immediate_winners: byes_by_pair.into_iter().map(|(_, t)| t).collect(),
    })
}

/// Plan the bracket and commit all of its matches in one store call.
///
/// Refuses to run when the tournament already has matches.
pub fn generate_bracket<R: Rng + ?Sized>(
    store: &mut Store,
    tournament_id: TournamentId,
    entrants: &[Entrant],
    rng: &mut R,
) -> Result<GeneratedBracket, TournamentError> {
    store.tournament(tournament_id)?;
    if store.has_matches(tournament_id) {
        return Err(TournamentError::conflict("Bracket already generated for this tournament"));
    }
    let plan = plan_bracket(tournament_id, entrants, rng)?;
    let matches = store.insert_matches(plan.matches);
    log::info!(
        "Generated bracket for tournament {}: {} matches, {} byes",
        tournament_id,
        matches.len(),
        plan.immediate_winners.len()
    );
    Ok(GeneratedBracket {
        matches,
        immediate_winners: plan.immediate_winners,
    })
}
