//! Integration tests for the tournament lifecycle, registration, and configuration.

mod common;

use bracket_tournament_web::{
    close_registration, create_team, create_tournament, delete_tournament, open_registration,
    register_solo, register_team, start_if_due, total_rounds, tournament_matches, AppConfig,
    Registrant, RequestContext, Store, TournamentError, TournamentSettings, TournamentStatus,
};
use chrono::Duration;
use common::{ctx, open_solo_tournament, rng, start_date, Fixture};
use std::collections::HashMap;
use uuid::Uuid;

#[test]
fn status_only_moves_forward() {
    let mut store = Store::default();
    let organizer = Uuid::new_v4();
    let t = create_tournament(&mut store, &ctx(organizer), TournamentSettings::solo("Cup", start_date())).unwrap();
    assert_eq!(t.status, TournamentStatus::Draft);

    assert!(matches!(
        close_registration(&mut store, &ctx(organizer), t.id, &mut rng(1)),
        Err(TournamentError::Conflict(_))
    ));
    open_registration(&mut store, &ctx(organizer), t.id).unwrap();
    assert!(matches!(
        open_registration(&mut store, &ctx(organizer), t.id),
        Err(TournamentError::Conflict(_))
    ));
}

#[test]
fn only_the_organizer_runs_the_lifecycle() {
    let mut store = Store::default();
    let (t, _organizer, players) = open_solo_tournament(&mut store, 4);
    let player = ctx(players[0]);
    assert!(matches!(
        close_registration(&mut store, &player, t, &mut rng(1)),
        Err(TournamentError::Permission(_))
    ));
    assert!(matches!(
        delete_tournament(&mut store, &player, t),
        Err(TournamentError::Permission(_))
    ));
    assert!(matches!(
        create_tournament(&mut store, &RequestContext::anonymous(), TournamentSettings::solo("Cup", start_date())),
        Err(TournamentError::Permission(_))
    ));
}

#[test]
fn bad_settings_are_rejected() {
    let mut store = Store::default();
    let organizer = ctx(Uuid::new_v4());
    let mut settings = TournamentSettings::solo("Cup", start_date());
    settings.bracket_min_teams = 1;
    assert!(matches!(
        create_tournament(&mut store, &organizer, settings),
        Err(TournamentError::Validation(_))
    ));

    let mut settings = TournamentSettings::solo("Cup", start_date());
    settings.registration_deadline = Some(start_date() + Duration::hours(2));
    assert!(matches!(
        create_tournament(&mut store, &organizer, settings),
        Err(TournamentError::Validation(_))
    ));

    let settings = TournamentSettings::teams("Cup", start_date(), 3, 2);
    assert!(matches!(
        create_tournament(&mut store, &organizer, settings),
        Err(TournamentError::Validation(_))
    ));
}

#[test]
fn closing_generates_bracket_and_starts() {
    let f = Fixture::started(5, 31);
    let t = f.store.tournament(f.tournament_id).unwrap();
    assert_eq!(t.status, TournamentStatus::InProgress);
    assert_eq!(t.bracket_max_teams, Some(5));

    // every solo player now captains a one-member wrapper team
    let wrapper_captains: Vec<_> = tournament_matches(&f.store, f.tournament_id)
        .unwrap()
        .iter()
        .flat_map(|m| [m.team_a.team(), m.team_b.team()])
        .flatten()
        .map(|team_id| {
            let team = f.store.team(team_id).unwrap();
            assert!(team.is_solo);
            assert_eq!(team.size(), 1);
            team.captain().unwrap()
        })
        .collect();
    assert_eq!(wrapper_captains.len(), 5);
    for player in &f.players {
        assert!(wrapper_captains.contains(player));
    }
}

#[test]
fn closing_twice_never_builds_a_second_bracket() {
    let mut f = Fixture::started(4, 32);
    let organizer = f.organizer_ctx();
    assert!(matches!(
        close_registration(&mut f.store, &organizer, f.tournament_id, &mut rng(2)),
        Err(TournamentError::Conflict(_))
    ));
    assert_eq!(f.store.matches(f.tournament_id).count(), 2);
}

#[test]
fn too_few_entrants_leaves_registration_open() {
    let mut store = Store::default();
    let (t, organizer, _players) = open_solo_tournament(&mut store, 1);
    assert!(matches!(
        close_registration(&mut store, &ctx(organizer), t, &mut rng(1)),
        Err(TournamentError::Validation(_))
    ));
    assert_eq!(store.tournament(t).unwrap().status, TournamentStatus::RegistrationOpen);
    assert!(!store.has_matches(t));
}

#[test]
fn minimum_entrants_setting_is_enforced() {
    let mut store = Store::default();
    let organizer = Uuid::new_v4();
    let mut settings = TournamentSettings::solo("Cup", start_date());
    settings.bracket_min_teams = 4;
    let t = create_tournament(&mut store, &ctx(organizer), settings).unwrap();
    open_registration(&mut store, &ctx(organizer), t.id).unwrap();
    for i in 0..3 {
        register_solo(&mut store, &ctx(Uuid::new_v4()), t.id, &format!("P{i}")).unwrap();
    }
    assert!(matches!(
        close_registration(&mut store, &ctx(organizer), t.id, &mut rng(1)),
        Err(TournamentError::Validation(_))
    ));
}

#[test]
fn solo_registration_rules() {
    let mut store = Store::default();
    let organizer = Uuid::new_v4();
    let mut settings = TournamentSettings::solo("Cup", start_date());
    settings.bracket_max_teams = Some(2);
    let t = create_tournament(&mut store, &ctx(organizer), settings).unwrap();

    let player = ctx(Uuid::new_v4());
    assert!(matches!(
        register_solo(&mut store, &player, t.id, "Early"),
        Err(TournamentError::Conflict(_))
    ));
    open_registration(&mut store, &ctx(organizer), t.id).unwrap();

    let registration = register_solo(&mut store, &player, t.id, "  Ann ").unwrap();
    assert!(matches!(
        registration.registrant,
        Registrant::Solo { ref display_name, .. } if display_name == "Ann"
    ));
    assert!(matches!(
        register_solo(&mut store, &player, t.id, "Ann again"),
        Err(TournamentError::Conflict(_))
    ));
    assert!(matches!(
        register_solo(&mut store, &ctx(Uuid::new_v4()), t.id, "   "),
        Err(TournamentError::Validation(_))
    ));
    register_solo(&mut store, &ctx(Uuid::new_v4()), t.id, "Bob").unwrap();
    assert!(matches!(
        register_solo(&mut store, &ctx(Uuid::new_v4()), t.id, "Cid"),
        Err(TournamentError::Validation(_))
    ));

    let late = ctx(Uuid::new_v4()).at(start_date() + Duration::hours(1));
    let (other, _, _) = open_solo_tournament(&mut store, 0);
    assert!(matches!(
        register_solo(&mut store, &late, other, "Late"),
        Err(TournamentError::Validation(_))
    ));
}

#[test]
fn team_registration_rules() {
    let mut store = Store::default();
    let organizer = Uuid::new_v4();
    let settings = TournamentSettings::teams("Trios", start_date(), 3, 3);
    let t = create_tournament(&mut store, &ctx(organizer), settings).unwrap();
    open_registration(&mut store, &ctx(organizer), t.id).unwrap();

    let captain = Uuid::new_v4();
    let mates = [Uuid::new_v4(), Uuid::new_v4()];
    let full = create_team(&mut store, &ctx(captain), "Full", &mates).unwrap();
    let short = create_team(&mut store, &ctx(captain), "Short", &mates[..1]).unwrap();

    assert!(matches!(
        register_team(&mut store, &ctx(mates[0]), t.id, full.id),
        Err(TournamentError::Permission(_))
    ));
    assert!(matches!(
        register_team(&mut store, &ctx(captain), t.id, short.id),
        Err(TournamentError::Validation(_))
    ));
    assert!(matches!(
        register_solo(&mut store, &ctx(captain), t.id, "Lone wolf"),
        Err(TournamentError::Validation(_))
    ));
    assert!(matches!(
        register_team(&mut store, &ctx(captain), t.id, Uuid::new_v4()),
        Err(TournamentError::NotFound { .. })
    ));
    register_team(&mut store, &ctx(captain), t.id, full.id).unwrap();
    assert!(matches!(
        register_team(&mut store, &ctx(captain), t.id, full.id),
        Err(TournamentError::Conflict(_))
    ));
}

#[test]
fn roster_that_shrank_after_registering_is_left_out() {
    let mut store = Store::default();
    let organizer = Uuid::new_v4();
    let settings = TournamentSettings::teams("Duos", start_date(), 2, 2);
    let t = create_tournament(&mut store, &ctx(organizer), settings).unwrap();
    open_registration(&mut store, &ctx(organizer), t.id).unwrap();

    let mut team_ids = Vec::new();
    for name in ["A", "B", "C"] {
        let captain = Uuid::new_v4();
        let team = create_team(&mut store, &ctx(captain), name, &[Uuid::new_v4()]).unwrap();
        register_team(&mut store, &ctx(captain), t.id, team.id).unwrap();
        team_ids.push(team.id);
    }
    store.team_mut(team_ids[2]).unwrap().members.truncate(1);

    let bracket = close_registration(&mut store, &ctx(organizer), t.id, &mut rng(3)).unwrap();
    assert_eq!(bracket.matches.len(), 1);
    assert!(!bracket.matches[0].contains(team_ids[2]));
    assert_eq!(store.tournament(t.id).unwrap().bracket_max_teams, Some(2));
}

#[test]
fn start_date_closes_registration_lazily() {
    let mut store = Store::default();
    let (t, _organizer, _players) = open_solo_tournament(&mut store, 4);
    let reader = RequestContext::anonymous();

    assert!(start_if_due(&mut store, &reader, t, &mut rng(1)).unwrap().is_none());
    assert_eq!(store.tournament(t).unwrap().status, TournamentStatus::RegistrationOpen);

    let later = reader.at(start_date() + Duration::hours(1));
    let bracket = start_if_due(&mut store, &later, t, &mut rng(1)).unwrap().unwrap();
    assert_eq!(bracket.matches.len(), 2);
    assert_eq!(store.tournament(t).unwrap().status, TournamentStatus::InProgress);

    // a second poll does nothing
    assert!(start_if_due(&mut store, &later, t, &mut rng(1)).unwrap().is_none());
    assert_eq!(store.matches(t).count(), 2);
}

#[test]
fn start_date_with_too_few_entrants_keeps_waiting() {
    let mut store = Store::default();
    let (t, _organizer, _players) = open_solo_tournament(&mut store, 1);
    let later = RequestContext::anonymous().at(start_date() + Duration::hours(1));
    assert!(start_if_due(&mut store, &later, t, &mut rng(1)).unwrap().is_none());
    assert_eq!(store.tournament(t).unwrap().status, TournamentStatus::RegistrationOpen);
}

#[test]
fn matches_are_listed_by_round_then_slot() {
    let mut f = Fixture::started(6, 33);
    let organizer = f.organizer_ctx();
    let notifier = bracket_tournament_web::LogNotifier;
    // finish the round-1 match at slot 3 before slot 2 so round 2 is built out of order
    for slot in [3, 2] {
        let m = f.match_at(1, slot);
        let winner = m.team_a.team().unwrap();
        bracket_tournament_web::resolve_as_organizer(&mut f.store, &organizer, m.id, winner, &notifier)
            .unwrap();
    }
    let listed: Vec<(u32, u32)> = tournament_matches(&f.store, f.tournament_id)
        .unwrap()
        .iter()
        .map(|m| (m.round, m.slot))
        .collect();
    let mut sorted = listed.clone();
    sorted.sort();
    assert_eq!(listed, sorted);
}

#[test]
fn delete_removes_everything_for_the_tournament() {
    let mut f = Fixture::started(4, 34);
    let keep = Fixture::started(2, 35);
    let organizer = f.organizer_ctx();
    let removed = delete_tournament(&mut f.store, &organizer, f.tournament_id).unwrap();
    assert_eq!(removed.id, f.tournament_id);
    assert!(matches!(
        f.store.tournament(f.tournament_id),
        Err(TournamentError::NotFound { .. })
    ));
    assert!(!f.store.has_matches(f.tournament_id));
    assert_eq!(f.store.registrations(f.tournament_id).count(), 0);
    assert!(keep.store.has_matches(keep.tournament_id));
}

#[test]
fn total_rounds_pads_to_a_power_of_two() {
    assert_eq!(total_rounds(None, 8), 3);
    assert_eq!(total_rounds(Some(2), 8), 1);
    assert_eq!(total_rounds(Some(3), 8), 2);
    assert_eq!(total_rounds(Some(5), 8), 3);
    assert_eq!(total_rounds(Some(16), 8), 4);
    assert_eq!(total_rounds(Some(17), 8), 5);
}

#[test]
fn config_reads_overrides_and_ignores_garbage() {
    let vars: HashMap<&str, &str> = [("HOST", "127.0.0.1"), ("PORT", "not a port"), ("DEFAULT_BRACKET_SIZE", "16")]
        .into_iter()
        .collect();
    let config = AppConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 8080);
    assert_eq!(config.default_bracket_size, 16);
    assert_eq!(AppConfig::from_lookup(|_| None), AppConfig::default());
}
