//! Tournament and its forward-only status machine.

use crate::error::TournamentError;
use crate::models::team::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Current phase of the tournament. Only ever moves to its successor.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Created by the organizer; not yet accepting entrants.
    #[default]
    Draft,
    /// Accepting registrations.
    RegistrationOpen,
    /// Bracket generated; matches being played.
    InProgress,
    /// Final-round match decided.
    Completed,
}

impl TournamentStatus {
    /// The only status this one may move to.
    pub fn successor(self) -> Option<Self> {
        use TournamentStatus::*;
        match self {
            Draft => Some(RegistrationOpen),
            RegistrationOpen => Some(InProgress),
            InProgress => Some(Completed),
            Completed => None,
        }
    }
}

/// Organizer-supplied settings for a new tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentSettings {
    pub name: String,
    #[serde(default)]
    pub is_team_based: bool,
    #[serde(default = "default_min_teams")]
    pub bracket_min_teams: u32,
    #[serde(default)]
    pub bracket_max_teams: Option<u32>,
    #[serde(default = "default_team_size")]
    pub team_min_size: u32,
    #[serde(default = "default_team_size")]
    pub team_max_size: u32,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub registration_deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

fn default_min_teams() -> u32 {
    2
}

fn default_team_size() -> u32 {
    1
}

impl TournamentSettings {
    /// Solo tournament with default bounds starting at `start_date`.
    pub fn solo(name: impl Into<String>, start_date: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            is_team_based: false,
            bracket_min_teams: default_min_teams(),
            bracket_max_teams: None,
            team_min_size: default_team_size(),
            team_max_size: default_team_size(),
            start_date,
            registration_deadline: None,
            end_date: None,
        }
    }

    /// Team tournament with rosters of `min..=max` members.
    pub fn teams(name: impl Into<String>, start_date: DateTime<Utc>, min: u32, max: u32) -> Self {
        Self {
            is_team_based: true,
            team_min_size: min,
            team_max_size: max,
            ..Self::solo(name, start_date)
        }
    }

    pub fn validate(&self) -> Result<(), TournamentError> {
        if self.name.trim().is_empty() {
            return Err(TournamentError::validation("Tournament name must not be empty"));
        }
        if self.bracket_min_teams < 2 {
            return Err(TournamentError::validation("A bracket needs at least 2 entrants"));
        }
        if let Some(max) = self.bracket_max_teams {
            if max < self.bracket_min_teams {
                return Err(TournamentError::validation(format!(
                    "Maximum entrants ({}) is below the minimum ({})",
                    max, self.bracket_min_teams
                )));
            }
        }
        if self.team_min_size == 0 || self.team_min_size > self.team_max_size {
            return Err(TournamentError::validation("Invalid team size bounds"));
        }
        if !self.is_team_based && self.team_max_size != 1 {
            return Err(TournamentError::validation("Solo tournaments have one-member entrants"));
        }
        if let Some(deadline) = self.registration_deadline {
            if deadline > self.start_date {
                return Err(TournamentError::validation(
                    "Registration deadline must not be after the start date",
                ));
            }
        }
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(TournamentError::validation("End date must not be before the start date"));
            }
        }
        Ok(())
    }
}

/// A single-elimination tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub status: TournamentStatus,
    pub is_team_based: bool,
    pub bracket_min_teams: u32,
    /// Upper bound while registering; overwritten with the realized entrant count at generation.
    pub bracket_max_teams: Option<u32>,
    pub team_min_size: u32,
    pub team_max_size: u32,
    pub start_date: DateTime<Utc>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub organizer_id: UserId,
}

impl Tournament {
    /// Create a new tournament in Draft, owned by `organizer_id`.
    pub fn new(settings: TournamentSettings, organizer_id: UserId) -> Result<Self, TournamentError> {
        settings.validate()?;
        Ok(Self {
            id: Uuid::new_v4(),
            name: settings.name.trim().to_string(),
            status: TournamentStatus::Draft,
            is_team_based: settings.is_team_based,
            bracket_min_teams: settings.bracket_min_teams,
            bracket_max_teams: settings.bracket_max_teams,
            team_min_size: settings.team_min_size,
            team_max_size: settings.team_max_size,
            start_date: settings.start_date,
            registration_deadline: settings.registration_deadline,
            end_date: settings.end_date,
            organizer_id,
        })
    }

    pub fn is_organizer(&self, user_id: UserId) -> bool {
        self.organizer_id == user_id
    }

    /// Permission error unless `user_id` organizes this tournament.
    pub fn require_organizer(&self, user_id: UserId) -> Result<(), TournamentError> {
        if self.is_organizer(user_id) {
            Ok(())
        } else {
            Err(TournamentError::permission("Only the organizer may do this"))
        }
    }

    /// Move to `next`, which must be the immediate successor of the current status.
    pub fn advance_status(&mut self, next: TournamentStatus) -> Result<(), TournamentError> {
        if self.status.successor() != Some(next) {
            return Err(TournamentError::conflict(format!(
                "Cannot move tournament from {:?} to {:?}",
                self.status, next
            )));
        }
        log::info!("Tournament {} status {:?} -> {:?}", self.id, self.status, next);
        self.status = next;
        Ok(())
    }

    /// Last moment registrations are accepted: the deadline, or the start date without one.
    pub fn registration_closes_at(&self) -> DateTime<Utc> {
        self.registration_deadline.unwrap_or(self.start_date)
    }
}
