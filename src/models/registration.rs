//! Tournament registrations: a solo user or a team signed up for a tournament.

use crate::models::team::{TeamId, UserId};
use crate::models::tournament::TournamentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who registered.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Registrant {
    /// A single player; wrapped in a one-member team when the bracket is generated.
    Solo { user_id: UserId, display_name: String },
    Team { team_id: TeamId },
}

impl Registrant {
    /// True when both refer to the same user or the same team.
    pub fn same_entrant(&self, other: &Registrant) -> bool {
        match (self, other) {
            (Registrant::Solo { user_id: a, .. }, Registrant::Solo { user_id: b, .. }) => a == b,
            (Registrant::Team { team_id: a }, Registrant::Team { team_id: b }) => a == b,
            _ => false,
        }
    }
}

/// Unique per (tournament, entrant).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentRegistration {
    pub tournament_id: TournamentId,
    pub registrant: Registrant,
    pub registered_at: DateTime<Utc>,
}
