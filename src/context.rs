//! Per-request context: who is calling and when.

use crate::error::TournamentError;
use crate::models::UserId;
use chrono::{DateTime, Utc};

/// Immutable value built once per request and passed down to every operation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RequestContext {
    pub user_id: Option<UserId>,
    pub now: DateTime<Utc>,
}

impl RequestContext {
    /// Context for an identified caller at the current time.
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            now: Utc::now(),
        }
    }

    /// Context with no caller (reads, start-date checks).
    pub fn anonymous() -> Self {
        Self {
            user_id: None,
            now: Utc::now(),
        }
    }

    /// Same caller, pinned to a given time.
    pub fn at(self, now: DateTime<Utc>) -> Self {
        Self { now, ..self }
    }

    /// The caller id, or a permission error when the request is anonymous.
    pub fn require_user(&self) -> Result<UserId, TournamentError> {
        self.user_id
            .ok_or_else(|| TournamentError::permission("An identified user is required"))
    }
}
