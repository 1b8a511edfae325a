//! Registration: sign a solo player or a team up for a tournament while registration is open.

use crate::context::RequestContext;
use crate::error::TournamentError;
use crate::models::{Registrant, TeamId, Tournament, TournamentId, TournamentRegistration, TournamentStatus};
use crate::store::Store;

/// Register the caller as a solo entrant under `display_name`.
pub fn register_solo(
    store: &mut Store,
    ctx: &RequestContext,
    tournament_id: TournamentId,
    display_name: &str,
) -> Result<TournamentRegistration, TournamentError> {
    let user_id = ctx.require_user()?;
    let display_name = display_name.trim();
    if display_name.is_empty() {
        return Err(TournamentError::validation("Display name must not be empty"));
    }
    let tournament = store.tournament(tournament_id)?;
    if tournament.is_team_based {
        return Err(TournamentError::validation("This tournament takes team registrations"));
    }
    let registrant = Registrant::Solo {
        user_id,
        display_name: display_name.to_string(),
    };
    check_open(store, tournament, ctx, &registrant)?;
    Ok(insert(store, ctx, tournament_id, registrant))
}

/// Register a team. Only its current captain may do so, and the roster must fit the bounds.
pub fn register_team(
    store: &mut Store,
    ctx: &RequestContext,
    tournament_id: TournamentId,
    team_id: TeamId,
) -> Result<TournamentRegistration, TournamentError> {
    let user_id = ctx.require_user()?;
    let tournament = store.tournament(tournament_id)?;
    if !tournament.is_team_based {
        return Err(TournamentError::validation("This tournament takes solo registrations"));
    }
    let team = store.team(team_id)?;
    if !team.is_captain(user_id) {
        return Err(TournamentError::permission("Only the team captain may register the team"));
    }
    let size = team.size() as u32;
    if size < tournament.team_min_size || size > tournament.team_max_size {
        return Err(TournamentError::validation(format!(
            "Team has {} members; this tournament needs {} to {}",
            size, tournament.team_min_size, tournament.team_max_size
        )));
    }
    let registrant = Registrant::Team { team_id };
    check_open(store, tournament, ctx, &registrant)?;
    Ok(insert(store, ctx, tournament_id, registrant))
}

fn check_open(
    store: &Store,
    tournament: &Tournament,
    ctx: &RequestContext,
    registrant: &Registrant,
) -> Result<(), TournamentError> {
    if tournament.status != TournamentStatus::RegistrationOpen {
        return Err(TournamentError::conflict("Registration is not open"));
    }
    if ctx.now > tournament.registration_closes_at() {
        return Err(TournamentError::validation("The registration deadline has passed"));
    }
    if store.is_registered(tournament.id, registrant) {
        return Err(TournamentError::conflict("Already registered for this tournament"));
    }
    if let Some(max) = tournament.bracket_max_teams {
        if store.registrations(tournament.id).count() >= max as usize {
            return Err(TournamentError::validation(format!(
                "Tournament is full ({} entrants)",
                max
            )));
        }
    }
    Ok(())
}

fn insert(
    store: &mut Store,
    ctx: &RequestContext,
    tournament_id: TournamentId,
    registrant: Registrant,
) -> TournamentRegistration {
    let registration = TournamentRegistration {
        tournament_id,
        registrant,
        registered_at: ctx.now,
    };
    log::info!("Registered {:?} for tournament {}", registration.registrant, tournament_id);
    store.insert_registration(registration.clone());
    registration
}
