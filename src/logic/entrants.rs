//! Entrant adapter: turn registrations into the uniform entrant list the bracket is built from.

use crate::error::TournamentError;
use crate::models::{Registrant, Team, TeamId, TournamentId};
use crate::store::Store;
use serde::{Deserialize, Serialize};

/// A bracket participant: a real team, or a solo player's one-member wrapper team.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Entrant {
    pub team_id: TeamId,
    pub name: String,
}

impl From<&Team> for Entrant {
    fn from(team: &Team) -> Self {
        Self {
            team_id: team.id,
            name: team.name.clone(),
        }
    }
}

/// Entrants plus the solo wrapper teams that must be stored if the bracket is committed.
#[derive(Clone, Debug, Default)]
pub struct EntrantList {
    pub entrants: Vec<Entrant>,
    pub new_teams: Vec<Team>,
}

/// Collect entrants in registration order without touching the store.
///
/// Team registrations whose roster has drifted outside the tournament's size bounds
/// since registering are left out.
pub fn collect_entrants(store: &Store, tournament_id: TournamentId) -> Result<EntrantList, TournamentError> {
    let tournament = store.tournament(tournament_id)?;
    let size_bounds = tournament.team_min_size as usize..=tournament.team_max_size as usize;
    let mut list = EntrantList::default();

    for registration in store.registrations(tournament_id) {
        match &registration.registrant {
            Registrant::Team { team_id } => {
                let team = store.team(*team_id)?;
                if !size_bounds.contains(&team.size()) {
                    log::warn!(
                        "Skipping team {} ({}) in tournament {}: roster size {} outside {:?}",
                        team.id,
                        team.name,
                        tournament_id,
                        team.size(),
                        size_bounds
                    );
                    continue;
                }
                list.entrants.push(Entrant::from(team));
            }
            Registrant::Solo {
                user_id,
                display_name,
            } => {
                let team = Team::solo(display_name.clone(), *user_id);
                list.entrants.push(Entrant::from(&team));
                list.new_teams.push(team);
            }
        }
    }
    Ok(list)
}
