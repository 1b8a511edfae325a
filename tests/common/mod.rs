//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use bracket_tournament_web::{
    close_registration, create_tournament, open_registration, register_solo, GameMatch,
    RequestContext, Store, TeamId, TournamentId, TournamentSettings, UserId,
};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Start date used by fixtures: far enough ahead that registration is open.
pub fn start_date() -> DateTime<Utc> {
    Utc::now() + Duration::days(1)
}

pub fn ctx(user: UserId) -> RequestContext {
    RequestContext::for_user(user)
}

/// Solo tournament with `n` registered players, registration still open.
pub fn open_solo_tournament(store: &mut Store, n: usize) -> (TournamentId, UserId, Vec<UserId>) {
    let organizer = Uuid::new_v4();
    let t = create_tournament(store, &ctx(organizer), TournamentSettings::solo("Cup", start_date())).unwrap();
    open_registration(store, &ctx(organizer), t.id).unwrap();
    let players = (0..n)
        .map(|i| {
            let user = Uuid::new_v4();
            register_solo(store, &ctx(user), t.id, &format!("Player {i}")).unwrap();
            user
        })
        .collect();
    (t.id, organizer, players)
}

/// A started solo tournament.
pub struct Fixture {
    pub store: Store,
    pub tournament_id: TournamentId,
    pub organizer: UserId,
    pub players: Vec<UserId>,
}

impl Fixture {
    pub fn started(n: usize, seed: u64) -> Self {
        let mut store = Store::default();
        let (tournament_id, organizer, players) = open_solo_tournament(&mut store, n);
        close_registration(&mut store, &ctx(organizer), tournament_id, &mut rng(seed)).unwrap();
        Self {
            store,
            tournament_id,
            organizer,
            players,
        }
    }

    pub fn organizer_ctx(&self) -> RequestContext {
        ctx(self.organizer)
    }

    /// Context for whoever captains `team_id` right now.
    pub fn captain_ctx(&self, team_id: TeamId) -> RequestContext {
        ctx(self.store.team(team_id).unwrap().captain().unwrap())
    }

    pub fn round(&self, round: u32) -> Vec<GameMatch> {
        self.store
            .round_matches(self.tournament_id, round)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn match_at(&self, round: u32, slot: u32) -> GameMatch {
        self.store
            .match_at(self.tournament_id, round, slot)
            .cloned()
            .unwrap()
    }
}
