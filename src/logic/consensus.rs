//! Match result consensus: captains vote, matching votes resolve the match, and the
//! organizer can override at any time before completion.

use crate::context::RequestContext;
use crate::error::TournamentError;
use crate::logic::advance::{advance_round, Advance};
use crate::logic::completion::check_completion;
use crate::models::{GameMatch, MatchId, MatchResultVote, MatchStatus, Side, TeamId, VoteTally};
use crate::notify::{best_effort, Notifier};
use crate::store::Store;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// State of a match's vote after the latest change.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Fewer than one vote from each current captain.
    Awaiting,
    /// Both captains voted for different teams; the organizer must decide.
    Disagreement,
    /// Both captains named the same team; the match is completed.
    Resolved,
}

/// Returned from a vote: the current votes and what they add up to.
#[derive(Clone, Debug, Serialize)]
pub struct VoteOutcome {
    #[serde(rename = "match")]
    pub game: GameMatch,
    pub votes: Vec<MatchResultVote>,
    pub tally: VoteTally,
    pub resolution: Resolution,
}

/// Effects of completing a match.
#[derive(Clone, Debug)]
pub struct AppliedResult {
    pub game: GameMatch,
    pub advance: Advance,
    pub tournament_completed: bool,
}

/// Cast or replace the caller's vote, then try to resolve the match.
pub fn cast_vote(
    store: &mut Store,
    ctx: &RequestContext,
    match_id: MatchId,
    voted_for: Side,
    notifier: &dyn Notifier,
) -> Result<VoteOutcome, TournamentError> {
    let user_id = ctx.require_user()?;
    let m = store.get_match(match_id)?;
    if m.is_completed() {
        return Err(TournamentError::conflict("Match is already completed"));
    }
    let (team_a, team_b) = m
        .teams()
        .ok_or_else(|| TournamentError::validation("Match opponents are not decided yet"))?;
    if !store.is_current_captain(team_a, user_id) && !store.is_current_captain(team_b, user_id) {
        return Err(TournamentError::permission(
            "Only a captain of one of the two teams may vote",
        ));
    }

    store.upsert_vote(MatchResultVote {
        match_id,
        user_id,
        voted_for,
        cast_at: ctx.now,
    });
    store.match_mut(match_id)?.promote(MatchStatus::InProgress);
    log::debug!("User {} voted {:?} on match {}", user_id, voted_for, match_id);

    let resolution = match evaluate_votes(store, match_id)? {
        Evaluation::Agreed(winner) => {
            apply_result(store, match_id, winner, ctx.now, notifier)?;
            Resolution::Resolved
        }
        Evaluation::Disagreed => {
            let m = store.get_match(match_id)?;
            let tally = VoteTally::from_votes(&store.votes(match_id));
            let tournament = store.tournament(m.tournament_id)?;
            best_effort("teams disagree", notifier.teams_disagree(tournament, m, tally));
            Resolution::Disagreement
        }
        Evaluation::Pending => Resolution::Awaiting,
    };

    match_votes(store, match_id).map(|outcome| VoteOutcome {
        resolution,
        ..outcome
    })
}

/// Organizer sets the winner directly, bypassing the vote.
pub fn resolve_as_organizer(
    store: &mut Store,
    ctx: &RequestContext,
    match_id: MatchId,
    winner_team_id: TeamId,
    notifier: &dyn Notifier,
) -> Result<GameMatch, TournamentError> {
    let user_id = ctx.require_user()?;
    let m = store.get_match(match_id)?;
    store.tournament(m.tournament_id)?.require_organizer(user_id)?;
    if m.is_completed() {
        return Err(TournamentError::conflict("Match is already completed"));
    }
    if m.teams().is_none() || !m.contains(winner_team_id) {
        return Err(TournamentError::validation(
            "Winner must be one of the match's two teams",
        ));
    }
    log::info!(
        "Organizer {} resolves match {} for team {}",
        user_id,
        match_id,
        winner_team_id
    );
    let applied = apply_result(store, match_id, winner_team_id, ctx.now, notifier)?
        .ok_or_else(|| TournamentError::conflict("Match is already completed"))?;
    Ok(applied.game)
}

/// Current votes on a match, without changing anything.
pub fn match_votes(store: &Store, match_id: MatchId) -> Result<VoteOutcome, TournamentError> {
    let game = store.get_match(match_id)?.clone();
    let votes = store.votes(match_id);
    let tally = VoteTally::from_votes(&votes);
    let resolution = if game.is_completed() {
        Resolution::Resolved
    } else {
        match evaluate_votes(store, match_id)? {
            Evaluation::Disagreed => Resolution::Disagreement,
            _ => Resolution::Awaiting,
        }
    };
    Ok(VoteOutcome {
        game,
        votes,
        tally,
        resolution,
    })
}

/// Complete a match and run everything downstream of it.
///
/// The completion is conditional: `None` means another caller completed it first and
/// nothing further was done.
pub fn apply_result(
    store: &mut Store,
    match_id: MatchId,
    winner: TeamId,
    now: DateTime<Utc>,
    notifier: &dyn Notifier,
) -> Result<Option<AppliedResult>, TournamentError> {
    if !store.complete_match_if_open(match_id, winner, now)? {
        log::debug!("Match {} was already completed; skipping side effects", match_id);
        return Ok(None);
    }
    let game = store.get_match(match_id)?.clone();
    best_effort("match resolved", notifier.match_resolved(&game));

    let advance = advance_round(store, game.tournament_id, game.round, winner)?;
    let tournament_completed = check_completion(store, game.tournament_id, game.round, now, notifier)?;
    Ok(Some(AppliedResult {
        game,
        advance,
        tournament_completed,
    }))
}

enum Evaluation {
    Pending,
    Agreed(TeamId),
    Disagreed,
}

/// Decide from votes cast by whoever captains each team right now.
///
/// Needs exactly two qualifying votes: one from team A's captain, one from team B's.
fn evaluate_votes(store: &Store, match_id: MatchId) -> Result<Evaluation, TournamentError> {
    let m = store.get_match(match_id)?;
    let Some((team_a, team_b)) = m.teams() else {
        return Ok(Evaluation::Pending);
    };
    let qualifying: Vec<(Side, MatchResultVote)> = store
        .votes(match_id)
        .into_iter()
        .filter_map(|v| {
            if store.is_current_captain(team_a, v.user_id) {
                Some((Side::TeamA, v))
            } else if store.is_current_captain(team_b, v.user_id) {
                Some((Side::TeamB, v))
            } else {
                None
            }
        })
        .collect();
    if qualifying.len() != 2 {
        return Ok(Evaluation::Pending);
    }
    let from = |side: Side| qualifying.iter().find(|(s, _)| *s == side).map(|(_, v)| v.voted_for);
    let (Some(a_says), Some(b_says)) = (from(Side::TeamA), from(Side::TeamB)) else {
        return Ok(Evaluation::Pending);
    };
    if a_says != b_says {
        return Ok(Evaluation::Disagreed);
    }
    let winner = match a_says {
        Side::TeamA => team_a,
        Side::TeamB => team_b,
    };
    Ok(Evaluation::Agreed(winner))
}
