//! Match (game), bracket Slot, and Side.

use crate::models::team::TeamId;
use crate::models::tournament::TournamentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Which side of a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    TeamA,
    TeamB,
}

impl Side {
    /// The side a winner from bracket position `slot` lands on in the next round.
    pub fn for_child_slot(slot: u32) -> Self {
        if slot % 2 == 0 {
            Side::TeamA
        } else {
            Side::TeamB
        }
    }
}

/// One side of a match: a bound team, or a position still waiting on an earlier round.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "team_id")]
pub enum Slot {
    Determined(TeamId),
    #[default]
    Undetermined,
}

impl Slot {
    pub fn team(self) -> Option<TeamId> {
        match self {
            Slot::Determined(id) => Some(id),
            Slot::Undetermined => None,
        }
    }

    pub fn is_determined(self) -> bool {
        matches!(self, Slot::Determined(_))
    }
}

impl From<Option<TeamId>> for Slot {
    fn from(team: Option<TeamId>) -> Self {
        team.map_or(Slot::Undetermined, Slot::Determined)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Pending,
    Scheduled,
    InProgress,
    Completed,
}

/// A single bracket match.
///
/// `round` is 1-based; `slot` is the 0-based position within the round. The sibling
/// match sits at `slot ^ 1` and both feed the next-round match at `slot / 2`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    pub round: u32,
    pub slot: u32,
    pub team_a: Slot,
    pub team_b: Slot,
    /// Set exactly when status is Completed.
    pub winner_team_id: Option<TeamId>,
    pub status: MatchStatus,
    /// Store-assigned creation order.
    pub seq: u64,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl GameMatch {
    pub fn new(
        tournament_id: TournamentId,
        round: u32,
        slot: u32,
        team_a: Slot,
        team_b: Slot,
        status: MatchStatus,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            round,
            slot,
            team_a,
            team_b,
            winner_team_id: None,
            status,
            seq: 0,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn side(&self, side: Side) -> Slot {
        match side {
            Side::TeamA => self.team_a,
            Side::TeamB => self.team_b,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut Slot {
        match side {
            Side::TeamA => &mut self.team_a,
            Side::TeamB => &mut self.team_b,
        }
    }

    /// Which side `team_id` plays on, if any.
    pub fn side_of(&self, team_id: TeamId) -> Option<Side> {
        if self.team_a == Slot::Determined(team_id) {
            Some(Side::TeamA)
        } else if self.team_b == Slot::Determined(team_id) {
            Some(Side::TeamB)
        } else {
            None
        }
    }

    pub fn contains(&self, team_id: TeamId) -> bool {
        self.side_of(team_id).is_some()
    }

    /// Both teams, once both sides are bound.
    pub fn teams(&self) -> Option<(TeamId, TeamId)> {
        Some((self.team_a.team()?, self.team_b.team()?))
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    pub fn sibling_slot(&self) -> u32 {
        self.slot ^ 1
    }

    pub fn parent_slot(&self) -> u32 {
        self.slot / 2
    }

    /// Move the status forward. Backwards or same-status moves are ignored.
    pub fn promote(&mut self, status: MatchStatus) {
        if status > self.status && status != MatchStatus::Completed {
            self.status = status;
        }
    }
}
