//! Integration tests for team generation: buddies, coaches, balance, overflow, determinism.

use league_scheduler_web::logic::build_units;
use league_scheduler_web::models::{OverflowReason, UnmatchedReason};
use league_scheduler_web::{
    generate_teams, generate_teams_seeded, DivisionConfig, Player, SchedulerError, SeededRng,
};
use std::collections::{BTreeMap, HashMap};

fn player(id: &str, division: &str, skill: f64) -> Player {
    Player::new(id, format!("Player {id}"), division).with_skill(skill)
}

fn configs(entries: &[(&str, DivisionConfig)]) -> BTreeMap<String, DivisionConfig> {
    entries
        .iter()
        .map(|(d, c)| (d.to_string(), c.clone()))
        .collect()
}

fn seeded(players: &[Player], cfg: &BTreeMap<String, DivisionConfig>) -> league_scheduler_web::TeamGenerationResult {
    generate_teams(players, cfg, &mut SeededRng::from_seed_str("test")).unwrap()
}

#[test]
fn every_player_is_on_a_team_or_in_overflow() {
    let mut players: Vec<Player> = (0..23).map(|i| player(&format!("u10-{i}"), "U10", (i % 7) as f64)).collect();
    players.extend((0..9).map(|i| player(&format!("u12-{i}"), "U12", i as f64)));
    players[0] = players[0].clone().with_buddy("u10-1");
    players[1] = players[1].clone().with_buddy("u10-0");
    let cfg = configs(&[("U10", DivisionConfig::new(8)), ("U12", DivisionConfig::new(4))]);

    let result = seeded(&players, &cfg);

    for division in ["U10", "U12"] {
        let on_teams: usize = result
            .teams
            .iter()
            .filter(|t| t.division == division)
            .map(|t| t.players.len())
            .sum();
        let overflowed: usize = result
            .overflow
            .iter()
            .filter(|o| o.metadata.division == division)
            .map(|o| o.players.len())
            .sum();
        let input = players.iter().filter(|p| p.division == division).count();
        assert_eq!(on_teams + overflowed, input, "division {division}");
    }
    for team in &result.teams {
        let max = cfg[&team.division].max_roster_size as usize;
        assert!(team.players.len() <= max);
        assert!(team.players.iter().all(|p| p.division == team.division));
    }
}

#[test]
fn team_count_respects_roster_cap() {
    let players: Vec<Player> = (0..25).map(|i| player(&format!("p{i}"), "U10", 1.0)).collect();
    let cfg = configs(&[("U10", DivisionConfig::new(10))]);
    let result = seeded(&players, &cfg);
    assert_eq!(result.teams.len(), 3);
    assert!(result.overflow.is_empty());

    let cfg = configs(&[("U10", DivisionConfig::new(10).with_target_team_size(5))]);
    assert_eq!(seeded(&players, &cfg).teams.len(), 5);

    let cfg = configs(&[("U10", DivisionConfig::new(10).with_team_count(6))]);
    assert_eq!(seeded(&players, &cfg).teams.len(), 6);
}

#[test]
fn mutual_buddies_share_a_team() {
    let mut players: Vec<Player> = (0..12).map(|i| player(&format!("p{i}"), "U10", i as f64)).collect();
    players[2] = players[2].clone().with_buddy("p9");
    players[9] = players[9].clone().with_buddy("p2");
    let cfg = configs(&[("U10", DivisionConfig::new(4))]);

    let result = seeded(&players, &cfg);

    let a = result.team_of("p2").unwrap();
    let b = result.team_of("p9").unwrap();
    assert_eq!(a.id, b.id);
    assert!(result.unmatched_requests.is_empty());
}

#[test]
fn broken_buddy_requests_are_reported_once() {
    let players = vec![
        player("a", "U10", 1.0).with_buddy("a"),
        player("b", "U10", 1.0).with_buddy("c"),
        player("c", "U10", 1.0).with_buddy("d"),
        player("d", "U10", 1.0),
        player("e", "U10", 1.0).with_buddy("ghost"),
    ];
    let refs: Vec<&Player> = players.iter().collect();

    let (units, unmatched) = build_units("U10", &refs);

    assert_eq!(units.len(), 5);
    assert!(units.iter().all(|u| u.len() == 1));
    let reasons: HashMap<&str, UnmatchedReason> = unmatched
        .iter()
        .map(|u| (u.requester_id.as_str(), u.reason))
        .collect();
    assert_eq!(reasons["a"], UnmatchedReason::SelfReference);
    assert_eq!(reasons["b"], UnmatchedReason::NotReciprocal);
    assert_eq!(reasons["c"], UnmatchedReason::NotReciprocal);
    assert_eq!(reasons["e"], UnmatchedReason::MissingTarget);
    assert_eq!(unmatched.len(), 4);
}

#[test]
fn coached_players_join_their_coach() {
    let players = vec![
        player("p1", "U10", 5.0).with_coach("smith"),
        player("p2", "U10", 5.0).with_coach("jones"),
        player("p3", "U10", 5.0).with_coach("smith"),
        player("p4", "U10", 1.0),
        player("p5", "U10", 2.0),
        player("p6", "U10", 3.0),
    ];
    let cfg = configs(&[("U10", DivisionConfig::new(6))]);

    let result = seeded(&players, &cfg);

    assert!(result.teams.len() >= 2);
    let smith = result.team_of("p1").unwrap();
    assert_eq!(smith.coach_id.as_deref(), Some("smith"));
    assert_eq!(result.team_of("p3").unwrap().id, smith.id);
    assert_eq!(result.team_of("p2").unwrap().coach_id.as_deref(), Some("jones"));
    let coverage = &result.divisions[0].coach_coverage;
    assert_eq!(coverage.teams_with_coach, 2);
}

#[test]
fn assistant_only_unit_joins_team_with_that_assistant() {
    let players = vec![
        player("p1", "U10", 3.0).with_coach("head").with_assistant_coach("helper"),
        player("p2", "U10", 3.0).with_assistant_coach("helper"),
        player("p3", "U10", 3.0),
        player("p4", "U10", 3.0),
    ];
    let cfg = configs(&[("U10", DivisionConfig::new(3))]);

    let result = seeded(&players, &cfg);

    let team = result.team_of("p1").unwrap();
    assert_eq!(result.team_of("p2").unwrap().id, team.id);
    assert_eq!(team.assistant_coach_ids, vec!["helper".to_string()]);
}

#[test]
fn conflicting_head_coaches_in_one_unit_is_an_error() {
    let players = vec![
        player("a", "U10", 1.0).with_buddy("b").with_coach("smith"),
        player("b", "U10", 1.0).with_buddy("a").with_coach("jones"),
    ];
    let cfg = configs(&[("U10", DivisionConfig::new(6))]);
    let err = generate_teams_seeded(&players, &cfg, Some("x")).unwrap_err();
    assert!(matches!(err, SchedulerError::ConflictingCoaches { .. }));
}

#[test]
fn full_coach_team_overflows_with_coach_capacity() {
    let players = vec![
        player("p1", "U10", 1.0).with_coach("smith"),
        player("p2", "U10", 1.0).with_coach("smith"),
        player("p3", "U10", 1.0).with_coach("smith"),
    ];
    let cfg = configs(&[("U10", DivisionConfig::new(2))]);

    let result = seeded(&players, &cfg);

    assert_eq!(result.overflow.len(), 1);
    assert_eq!(result.overflow[0].reason, OverflowReason::CoachCapacity);
    assert_eq!(result.overflow[0].metadata.coach_id.as_deref(), Some("smith"));
    assert_eq!(result.overflow_by_reason.get("coach-capacity"), Some(&1));
}

#[test]
fn buddy_pair_that_fits_nowhere_overflows() {
    let players = vec![
        player("a", "U10", 1.0).with_buddy("b"),
        player("b", "U10", 1.0).with_buddy("a"),
        player("c", "U10", 10.0),
        player("d", "U10", 9.0),
    ];
    let cfg = configs(&[("U10", DivisionConfig::new(2))]);

    let result = seeded(&players, &cfg);

    assert_eq!(result.teams.len(), 2);
    assert_eq!(result.overflow.len(), 1);
    assert_eq!(result.overflow[0].reason, OverflowReason::BuddyRequest);
    assert_eq!(result.overflow[0].players.len(), 2);
    assert_eq!(result.overflow_by_reason.get("buddy request"), Some(&1));
}

#[test]
fn skill_is_spread_across_teams() {
    let players = vec![
        player("a", "U10", 10.0),
        player("b", "U10", 8.0),
        player("c", "U10", 6.0),
        player("d", "U10", 4.0),
    ];
    let cfg = configs(&[("U10", DivisionConfig::new(2))]);

    let result = seeded(&players, &cfg);

    assert_eq!(result.teams.len(), 2);
    for team in &result.teams {
        assert_eq!(team.players.len(), 2);
        assert!((team.average_skill() - 7.0).abs() < 1e-9);
    }
    assert!(result.divisions[0].skill_balance.spread.abs() < 1e-9);
}

#[test]
fn team_names_follow_config() {
    let players: Vec<Player> = (0..4).map(|i| player(&format!("p{i}"), "U8", 1.0)).collect();
    let cfg = configs(&[("U8", DivisionConfig::new(2).with_team_names(["Sharks", "Comets"]))]);
    let result = seeded(&players, &cfg);
    let names: Vec<&str> = result.teams.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Sharks", "Comets"]);
    assert_eq!(result.teams[0].id, "U8-team-1");
}

#[test]
fn duplicate_player_ids_are_rejected() {
    let players = vec![player("p1", "U10", 1.0), player("p1", "U10", 2.0)];
    let cfg = configs(&[("U10", DivisionConfig::new(5))]);
    assert_eq!(
        generate_teams_seeded(&players, &cfg, Some("s")).unwrap_err(),
        SchedulerError::DuplicatePlayerId("p1".to_string())
    );
}

#[test]
fn missing_or_invalid_config_is_rejected() {
    let players = vec![player("p1", "U10", 1.0)];
    assert!(matches!(
        generate_teams_seeded(&players, &BTreeMap::new(), Some("s")),
        Err(SchedulerError::MissingDivisionConfig(_))
    ));
    let cfg = configs(&[("U10", DivisionConfig::new(0))]);
    assert!(matches!(
        generate_teams_seeded(&players, &cfg, Some("s")),
        Err(SchedulerError::InvalidDivisionConfig { .. })
    ));
}

#[test]
fn same_seed_gives_identical_output() {
    let players: Vec<Player> = (0..30).map(|i| player(&format!("p{i}"), "U10", (i % 3) as f64)).collect();
    let cfg = configs(&[("U10", DivisionConfig::new(8))]);

    let first = generate_teams_seeded(&players, &cfg, Some("fall-2026")).unwrap();
    let second = generate_teams_seeded(&players, &cfg, Some("fall-2026")).unwrap();

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn different_seeds_change_the_mapping() {
    let players: Vec<Player> = (0..40).map(|i| player(&format!("p{i}"), "U10", 1.0)).collect();
    let cfg = configs(&[("U10", DivisionConfig::new(10))]);

    let a = generate_teams_seeded(&players, &cfg, Some("seed-a")).unwrap();
    let b = generate_teams_seeded(&players, &cfg, Some("seed-b")).unwrap();

    assert_ne!(a.team_player_rows(), b.team_player_rows());
}
