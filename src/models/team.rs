//! Team and TeamMember. A solo entrant is a one-member team.

use crate::error::TournamentError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team (used in matches and lookups).
pub type TeamId = Uuid;

/// Unique identifier for a user. Users themselves live in the auth subsystem.
pub type UserId = Uuid;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub team_id: TeamId,
    pub user_id: UserId,
    pub is_captain: bool,
}

/// A team. Exactly one member is captain at any time.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub members: Vec<TeamMember>,
    /// True for the wrapper created around a solo registrant.
    #[serde(default)]
    pub is_solo: bool,
}

impl Team {
    /// Create a team whose only member is its captain.
    pub fn new(name: impl Into<String>, captain: UserId) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            name: name.into(),
            members: vec![TeamMember {
                team_id: id,
                user_id: captain,
                is_captain: true,
            }],
            is_solo: false,
        }
    }

    /// Wrap a solo registrant as a one-member team.
    pub fn solo(name: impl Into<String>, user_id: UserId) -> Self {
        Self {
            is_solo: true,
            ..Self::new(name, user_id)
        }
    }

    pub fn captain(&self) -> Option<UserId> {
        self.members.iter().find(|m| m.is_captain).map(|m| m.user_id)
    }

    pub fn is_captain(&self, user_id: UserId) -> bool {
        self.captain() == Some(user_id)
    }

    pub fn is_member(&self, user_id: UserId) -> bool {
        self.members.iter().any(|m| m.user_id == user_id)
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// Add a non-captain member. (team, user) pairs are unique.
    pub fn add_member(&mut self, user_id: UserId) -> Result<(), TournamentError> {
        if self.is_solo {
            return Err(TournamentError::validation("A solo entrant cannot take members"));
        }
        if self.is_member(user_id) {
            return Err(TournamentError::conflict("User is already on this team"));
        }
        self.members.push(TeamMember {
            team_id: self.id,
            user_id,
            is_captain: false,
        });
        Ok(())
    }

    /// Hand the captaincy to another member; the old captain stays on the team.
    pub fn transfer_captaincy(&mut self, to: UserId) -> Result<(), TournamentError> {
        if !self.is_member(to) {
            return Err(TournamentError::validation("New captain must be a team member"));
        }
        for m in &mut self.members {
            m.is_captain = m.user_id == to;
        }
        Ok(())
    }
}
