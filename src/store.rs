//! In-memory storage for tournaments, teams, registrations, matches, and votes.
//!
//! The web binary wraps one `Store` in a lock and holds the write guard for the whole
//! of each mutating request, so every operation in `logic` runs as one unit.

use crate::config::DEFAULT_BRACKET_SIZE;
use crate::error::TournamentError;
use crate::models::{
    GameMatch, MatchId, MatchResultVote, MatchStatus, Registrant, Team, TeamId, Tournament,
    TournamentId, TournamentRegistration, UserId,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

#[derive(Debug)]
pub struct Store {
    tournaments: HashMap<TournamentId, Tournament>,
    teams: HashMap<TeamId, Team>,
    registrations: Vec<TournamentRegistration>,
    /// All matches in creation order.
    matches: Vec<GameMatch>,
    votes: Vec<MatchResultVote>,
    next_seq: u64,
    default_bracket_size: u32,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(DEFAULT_BRACKET_SIZE)
    }
}

impl Store {
    pub fn new(default_bracket_size: u32) -> Self {
        Self {
            tournaments: HashMap::new(),
            teams: HashMap::new(),
            registrations: Vec::new(),
            matches: Vec::new(),
            votes: Vec::new(),
            next_seq: 0,
            default_bracket_size,
        }
    }

    /// Bracket size assumed when a tournament has no `bracket_max_teams`.
    pub fn default_bracket_size(&self) -> u32 {
        self.default_bracket_size
    }

    // Tournaments

    pub fn insert_tournament(&mut self, tournament: Tournament) -> TournamentId {
        let id = tournament.id;
        self.tournaments.insert(id, tournament);
        id
    }

    pub fn tournament(&self, id: TournamentId) -> Result<&Tournament, TournamentError> {
        self.tournaments
            .get(&id)
            .ok_or_else(|| TournamentError::not_found("Tournament", id))
    }

    pub fn tournament_mut(&mut self, id: TournamentId) -> Result<&mut Tournament, TournamentError> {
        self.tournaments
            .get_mut(&id)
            .ok_or_else(|| TournamentError::not_found("Tournament", id))
    }

    /// Teardown: drop the tournament and everything hanging off it. Solo wrapper teams go too.
    pub fn remove_tournament(&mut self, id: TournamentId) -> Result<Tournament, TournamentError> {
        let tournament = self
            .tournaments
            .remove(&id)
            .ok_or_else(|| TournamentError::not_found("Tournament", id))?;
        let match_ids: Vec<MatchId> = self
            .matches
            .iter()
            .filter(|m| m.tournament_id == id)
            .map(|m| m.id)
            .collect();
        let solo_teams: Vec<TeamId> = self
            .matches
            .iter()
            .filter(|m| m.tournament_id == id)
            .flat_map(|m| [m.team_a.team(), m.team_b.team()])
            .flatten()
            .filter(|t| self.teams.get(t).is_some_and(|team| team.is_solo))
            .collect();
        self.votes.retain(|v| !match_ids.contains(&v.match_id));
        self.matches.retain(|m| m.tournament_id != id);
        self.registrations.retain(|r| r.tournament_id != id);
        for team_id in solo_teams {
            self.teams.remove(&team_id);
        }
        Ok(tournament)
    }

    // Teams

    pub fn insert_team(&mut self, team: Team) -> TeamId {
        let id = team.id;
        self.teams.insert(id, team);
        id
    }

    pub fn team(&self, id: TeamId) -> Result<&Team, TournamentError> {
        self.teams
            .get(&id)
            .ok_or_else(|| TournamentError::not_found("Team", id))
    }

    pub fn team_mut(&mut self, id: TeamId) -> Result<&mut Team, TournamentError> {
        self.teams
            .get_mut(&id)
            .ok_or_else(|| TournamentError::not_found("Team", id))
    }

    /// Whether `user_id` is, right now, captain of `team_id`.
    pub fn is_current_captain(&self, team_id: TeamId, user_id: UserId) -> bool {
        self.teams
            .get(&team_id)
            .is_some_and(|t| t.is_captain(user_id))
    }

    // Registrations

    pub fn registrations(&self, tournament_id: TournamentId) -> impl Iterator<Item = &TournamentRegistration> {
        self.registrations
            .iter()
            .filter(move |r| r.tournament_id == tournament_id)
    }

    pub fn is_registered(&self, tournament_id: TournamentId, registrant: &Registrant) -> bool {
        self.registrations(tournament_id)
            .any(|r| r.registrant.same_entrant(registrant))
    }

    pub fn insert_registration(&mut self, registration: TournamentRegistration) {
        self.registrations.push(registration);
    }

    // Matches

    /// Commit a batch of new matches together, stamping creation order.
    pub fn insert_matches(&mut self, matches: Vec<GameMatch>) -> Vec<GameMatch> {
        let mut committed = Vec::with_capacity(matches.len());
        for mut m in matches {
            m.seq = self.next_seq;
            self.next_seq += 1;
            committed.push(m.clone());
            self.matches.push(m);
        }
        committed
    }

    pub fn insert_match(&mut self, mut m: GameMatch) -> GameMatch {
        m.seq = self.next_seq;
        self.next_seq += 1;
        self.matches.push(m.clone());
        m
    }

    pub fn get_match(&self, id: MatchId) -> Result<&GameMatch, TournamentError> {
        self.matches
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| TournamentError::not_found("Match", id))
    }

    pub fn match_mut(&mut self, id: MatchId) -> Result<&mut GameMatch, TournamentError> {
        self.matches
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| TournamentError::not_found("Match", id))
    }

    pub fn has_matches(&self, tournament_id: TournamentId) -> bool {
        self.matches.iter().any(|m| m.tournament_id == tournament_id)
    }

    /// Matches of one tournament in creation order.
    pub fn matches(&self, tournament_id: TournamentId) -> impl Iterator<Item = &GameMatch> {
        self.matches
            .iter()
            .filter(move |m| m.tournament_id == tournament_id)
    }

    /// Matches of one round, ordered by bracket slot.
    pub fn round_matches(&self, tournament_id: TournamentId, round: u32) -> Vec<&GameMatch> {
        let mut out: Vec<_> = self
            .matches(tournament_id)
            .filter(|m| m.round == round)
            .collect();
        out.sort_by_key(|m| m.slot);
        out
    }

    pub fn match_at(&self, tournament_id: TournamentId, round: u32, slot: u32) -> Option<&GameMatch> {
        self.matches
            .iter()
            .find(|m| m.tournament_id == tournament_id && m.round == round && m.slot == slot)
    }

    /// Complete a match iff it is not already completed. Returns whether this call won.
    ///
    /// The winner must be one of the match's two bound teams.
    pub fn complete_match_if_open(
        &mut self,
        match_id: MatchId,
        winner: TeamId,
        at: DateTime<Utc>,
    ) -> Result<bool, TournamentError> {
        let m = self.match_mut(match_id)?;
        if m.is_completed() {
            return Ok(false);
        }
        if m.teams().is_none() || !m.contains(winner) {
            return Err(TournamentError::validation(
                "Winner must be one of the match's two teams",
            ));
        }
        m.winner_team_id = Some(winner);
        m.status = MatchStatus::Completed;
        m.completed_at = Some(at);
        Ok(true)
    }

    // Votes

    pub fn votes(&self, match_id: MatchId) -> Vec<MatchResultVote> {
        self.votes
            .iter()
            .filter(|v| v.match_id == match_id)
            .copied()
            .collect()
    }

    /// Insert or overwrite the caller's vote on a match.
    pub fn upsert_vote(&mut self, vote: MatchResultVote) {
        match self
            .votes
            .iter_mut()
            .find(|v| v.match_id == vote.match_id && v.user_id == vote.user_id)
        {
            Some(existing) => *existing = vote,
            None => self.votes.push(vote),
        }
    }
}
