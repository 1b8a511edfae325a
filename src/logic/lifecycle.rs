//! Tournament lifecycle: Draft -> RegistrationOpen -> InProgress -> Completed.
//!
//! Closing registration (by the organizer or because the start date passed) builds the
//! bracket; the status move and the match creation happen together or not at all.

use crate::context::RequestContext;
use crate::error::TournamentError;
use crate::logic::bracket::{generate_bracket, GeneratedBracket};
use crate::logic::entrants::collect_entrants;
use crate::models::{
    GameMatch, Team, Tournament, TournamentId, TournamentSettings, TournamentStatus, UserId,
};
use crate::store::Store;
use rand::Rng;

/// Create a tournament in Draft with the caller as organizer.
pub fn create_tournament(
    store: &mut Store,
    ctx: &RequestContext,
    settings: TournamentSettings,
) -> Result<Tournament, TournamentError> {
    let organizer = ctx.require_user()?;
    let tournament = Tournament::new(settings, organizer)?;
    log::info!("Created tournament {} ({})", tournament.id, tournament.name);
    store.insert_tournament(tournament.clone());
    Ok(tournament)
}

/// Draft -> RegistrationOpen (organizer only).
pub fn open_registration(
    store: &mut Store,
    ctx: &RequestContext,
    tournament_id: TournamentId,
) -> Result<Tournament, TournamentError> {
    let user_id = ctx.require_user()?;
    let tournament = store.tournament_mut(tournament_id)?;
    tournament.require_organizer(user_id)?;
    tournament.advance_status(TournamentStatus::RegistrationOpen)?;
    Ok(tournament.clone())
}

/// Organizer closes registration: generate the bracket and start the tournament.
pub fn close_registration<R: Rng + ?Sized>(
    store: &mut Store,
    ctx: &RequestContext,
    tournament_id: TournamentId,
    rng: &mut R,
) -> Result<GeneratedBracket, TournamentError> {
    let user_id = ctx.require_user()?;
    store.tournament(tournament_id)?.require_organizer(user_id)?;
    start_tournament(store, tournament_id, rng)
}

/// Start-date path: close registration without an organizer once `ctx.now` reaches the
/// start date. Returns the bracket when this call started the tournament.
///
/// Too few entrants is not an error here; the tournament stays open and a warning is logged.
pub fn start_if_due<R: Rng + ?Sized>(
    store: &mut Store,
    ctx: &RequestContext,
    tournament_id: TournamentId,
    rng: &mut R,
) -> Result<Option<GeneratedBracket>, TournamentError> {
    let tournament = store.tournament(tournament_id)?;
    if tournament.status != TournamentStatus::RegistrationOpen || ctx.now < tournament.start_date {
        return Ok(None);
    }
    match start_tournament(store, tournament_id, rng) {
        Ok(bracket) => Ok(Some(bracket)),
        Err(TournamentError::Validation(reason)) => {
            log::warn!(
                "Tournament {} reached its start date but cannot start: {}",
                tournament_id,
                reason
            );
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Organizer teardown: removes the tournament and its registrations, matches and votes.
pub fn delete_tournament(
    store: &mut Store,
    ctx: &RequestContext,
    tournament_id: TournamentId,
) -> Result<Tournament, TournamentError> {
    let user_id = ctx.require_user()?;
    store.tournament(tournament_id)?.require_organizer(user_id)?;
    let removed = store.remove_tournament(tournament_id)?;
    log::info!("Deleted tournament {} ({})", removed.id, removed.name);
    Ok(removed)
}

/// All matches of a tournament in bracket order: round ascending, then slot.
pub fn tournament_matches(store: &Store, tournament_id: TournamentId) -> Result<Vec<GameMatch>, TournamentError> {
    store.tournament(tournament_id)?;
    let mut matches: Vec<GameMatch> = store.matches(tournament_id).cloned().collect();
    matches.sort_by_key(|m| (m.round, m.slot));
    Ok(matches)
}

/// RegistrationOpen with no matches -> bracket generated, InProgress.
fn start_tournament<R: Rng + ?Sized>(
    store: &mut Store,
    tournament_id: TournamentId,
    rng: &mut R,
) -> Result<GeneratedBracket, TournamentError> {
    let tournament = store.tournament(tournament_id)?;
    if tournament.status != TournamentStatus::RegistrationOpen {
        return Err(TournamentError::conflict(format!(
            "Registration is not open (status {:?})",
            tournament.status
        )));
    }
    if store.has_matches(tournament_id) {
        return Err(TournamentError::conflict("Bracket already generated for this tournament"));
    }
    let required = tournament.bracket_min_teams.max(2) as usize;

    let list = collect_entrants(store, tournament_id)?;
    if list.entrants.len() < required {
        return Err(TournamentError::validation(format!(
            "Need at least {} entrants to start (have {})",
            required,
            list.entrants.len()
        )));
    }

    let bracket = generate_bracket(store, tournament_id, &list.entrants, rng)?;
    for team in list.new_teams {
        store.insert_team(team);
    }
    let tournament = store.tournament_mut(tournament_id)?;
    tournament.bracket_max_teams = Some(list.entrants.len() as u32);
    tournament.advance_status(TournamentStatus::InProgress)?;
    Ok(bracket)
}

/// Create a team with the caller as captain and the given extra members.
pub fn create_team(
    store: &mut Store,
    ctx: &RequestContext,
    name: &str,
    members: &[UserId],
) -> Result<Team, TournamentError> {
    let captain = ctx.require_user()?;
    let name = name.trim();
    if name.is_empty() {
        return Err(TournamentError::validation("Team name must not be empty"));
    }
    let mut team = Team::new(name, captain);
    for &member in members.iter().filter(|&&m| m != captain) {
        team.add_member(member)?;
    }
    store.insert_team(team.clone());
    Ok(team)
}
