//! Errors returned by tournament, bracket, and consensus operations.

use thiserror::Error;

/// Errors that can occur during tournament operations.
///
/// Validation and permission failures are always raised before any state changes.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TournamentError {
    /// Bad input shape or count (too few entrants, winner not in the match, ...).
    #[error("{0}")]
    Validation(String),
    /// Caller is not the captain or organizer the action requires.
    #[error("{0}")]
    Permission(String),
    /// Acting on a completed match, duplicate bracket generation, backwards status move.
    #[error("{0}")]
    Conflict(String),
    /// Unknown tournament, match, or team.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
}

impl TournamentError {
    pub fn validation(msg: impl Into<String>) -> Self {
        TournamentError::Validation(msg.into())
    }

    pub fn permission(msg: impl Into<String>) -> Self {
        TournamentError::Permission(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        TournamentError::Conflict(msg.into())
    }

    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        TournamentError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}
