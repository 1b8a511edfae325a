//! Best-effort outbound signals. Delivery lives elsewhere; failures are logged, never raised.

use crate::models::{GameMatch, Tournament, VoteTally};
use std::sync::Mutex;
use thiserror::Error;

#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("notification failed: {0}")]
pub struct NotifyError(pub String);

/// Receiver of "match resolved", "tournament completed" and "teams disagree" signals.
pub trait Notifier: Send + Sync {
    fn match_resolved(&self, m: &GameMatch) -> Result<(), NotifyError>;
    fn tournament_completed(&self, tournament: &Tournament) -> Result<(), NotifyError>;
    /// Both captains voted but named different winners; the organizer should step in.
    fn teams_disagree(&self, tournament: &Tournament, m: &GameMatch, tally: VoteTally) -> Result<(), NotifyError>;
}

/// Writes every signal to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn match_resolved(&self, m: &GameMatch) -> Result<(), NotifyError> {
        log::info!(
            "Match {} (round {}, slot {}) resolved, winner {:?}",
            m.id,
            m.round,
            m.slot,
            m.winner_team_id
        );
        Ok(())
    }

    fn tournament_completed(&self, tournament: &Tournament) -> Result<(), NotifyError> {
        log::info!("Tournament {} ({}) completed", tournament.id, tournament.name);
        Ok(())
    }

    fn teams_disagree(&self, tournament: &Tournament, m: &GameMatch, tally: VoteTally) -> Result<(), NotifyError> {
        log::warn!(
            "Captains disagree on match {} of tournament {} ({}-{}); organizer {} must resolve",
            m.id,
            tournament.id,
            tally.team_a,
            tally.team_b,
            tournament.organizer_id
        );
        Ok(())
    }
}

/// A signal captured by [`RecordingNotifier`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Signal {
    MatchResolved(GameMatch),
    TournamentCompleted(Tournament),
    TeamsDisagree(GameMatch, VoteTally),
}

/// Keeps every signal in memory, for tests and for inspection.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    signals: Mutex<Vec<Signal>>,
}

impl RecordingNotifier {
    pub fn signals(&self) -> Vec<Signal> {
        self.signals.lock().map(|s| s.clone()).unwrap_or_default()
    }

    fn push(&self, signal: Signal) -> Result<(), NotifyError> {
        self.signals
            .lock()
            .map_err(|_| NotifyError("recorder lock poisoned".to_string()))?
            .push(signal);
        Ok(())
    }
}

impl Notifier for RecordingNotifier {
    fn match_resolved(&self, m: &GameMatch) -> Result<(), NotifyError> {
        self.push(Signal::MatchResolved(m.clone()))
    }

    fn tournament_completed(&self, tournament: &Tournament) -> Result<(), NotifyError> {
        self.push(Signal::TournamentCompleted(tournament.clone()))
    }

    fn teams_disagree(&self, _tournament: &Tournament, m: &GameMatch, tally: VoteTally) -> Result<(), NotifyError> {
        self.push(Signal::TeamsDisagree(m.clone(), tally))
    }
}

/// Run a notification and log instead of propagating a failure.
pub(crate) fn best_effort(what: &str, result: Result<(), NotifyError>) {
    if let Err(e) = result {
        log::warn!("Dropping {} notification: {}", what, e);
    }
}
