//! Integration tests for the season run: authorization, override gating, persistence.

use chrono::{Duration, TimeZone, Utc};
use league_scheduler_web::{
    plan_season, run_season, AuthorizationStatus, Authorizer, DivisionConfig, ManualOverride,
    OverrideStatus, Player, RunSnapshot, RunStatus, SeasonRunRequest, Slot, SnapshotStore,
};
use std::cell::RefCell;
use std::collections::BTreeMap;

struct FixedAuth(AuthorizationStatus);

impl Authorizer for FixedAuth {
    fn authorize(&self) -> AuthorizationStatus {
        self.0
    }
}

#[derive(Default)]
struct RecordingStore {
    saved: RefCell<Vec<RunSnapshot>>,
    fail: bool,
}

impl SnapshotStore for RecordingStore {
    fn save_snapshot(&self, snapshot: &RunSnapshot) -> Result<(), String> {
        if self.fail {
            return Err("database unavailable".to_string());
        }
        self.saved.borrow_mut().push(snapshot.clone());
        Ok(())
    }
}

fn request() -> SeasonRunRequest {
    let players: Vec<Player> = (0..16)
        .map(|i| Player::new(format!("p{i}"), format!("Kid {i}"), "U10").with_skill((i % 5) as f64))
        .collect();
    let mut divisions = BTreeMap::new();
    divisions.insert("U10".to_string(), DivisionConfig::new(4));
    let slots: Vec<Slot> = (1..=3)
        .map(|w| {
            let start = Utc.with_ymd_and_hms(2026, 4, 4, 9, 0, 0).unwrap() + Duration::weeks(w as i64);
            Slot::new(format!("w{w}"), w, start, start + Duration::minutes(60), 1).on_field("F1")
        })
        .collect();
    SeasonRunRequest {
        season_id: "spring-2026".to_string(),
        players,
        divisions,
        slots,
        seed: Some("spring".to_string()),
    }
}

fn pending(id: &str) -> ManualOverride {
    ManualOverride {
        id: id.to_string(),
        status: OverrideStatus::Pending,
        note: None,
    }
}

#[test]
fn plan_runs_every_stage() {
    let plan = plan_season(&request()).unwrap();
    assert_eq!(plan.teams.teams.len(), 4);
    assert_eq!(plan.fixture_count, 6);
    assert_eq!(plan.schedule.assignments.len(), 3);
    assert_eq!(plan.schedule.unscheduled.len(), 3);
}

#[test]
fn authorized_run_is_saved() {
    let store = RecordingStore::default();
    let outcome = run_season(&FixedAuth(AuthorizationStatus::Authorized), &store, &request(), &[]);

    assert_eq!(outcome.status, RunStatus::Success);
    let saved = store.saved.borrow();
    assert_eq!(saved.len(), 1);
    let snapshot = &saved[0];
    assert_eq!(snapshot.season_id, "spring-2026");
    assert_eq!(snapshot.team_player_rows.len(), 16);
    assert_eq!(snapshot.team_rows.len(), 4);
    assert_eq!(snapshot.metrics.unscheduled, 3);
    assert_eq!(outcome.snapshot.as_ref().map(|s| s.run_id), Some(snapshot.run_id));
    assert_eq!(outcome.plan.as_ref().map(|p| p.evaluation.total_games), Some(3));
    assert!(outcome.message.contains("3 matchups unscheduled: no-slot-available: 3"));
}

#[test]
fn unauthorized_and_forbidden_stop_early() {
    let store = RecordingStore::default();
    let outcome = run_season(&FixedAuth(AuthorizationStatus::Unauthorized), &store, &request(), &[]);
    assert_eq!(outcome.status, RunStatus::Unauthorized);
    assert!(outcome.plan.is_none());

    let outcome = run_season(&FixedAuth(AuthorizationStatus::Forbidden), &store, &request(), &[]);
    assert_eq!(outcome.status, RunStatus::Forbidden);
    assert!(store.saved.borrow().is_empty());
}

#[test]
fn pending_overrides_block_persistence() {
    let store = RecordingStore::default();
    let overrides = vec![
        pending("o1"),
        ManualOverride {
            status: OverrideStatus::Applied,
            ..pending("o2")
        },
        pending("o3"),
    ];

    let outcome = run_season(&FixedAuth(AuthorizationStatus::Authorized), &store, &request(), &overrides);

    assert_eq!(outcome.status, RunStatus::Blocked);
    assert!(outcome.message.starts_with("2 pending"));
    assert!(outcome.plan.is_some());
    assert!(outcome.snapshot.is_none());
    assert!(store.saved.borrow().is_empty());
}

#[test]
fn store_failure_is_an_error() {
    let store = RecordingStore {
        fail: true,
        ..Default::default()
    };
    let outcome = run_season(&FixedAuth(AuthorizationStatus::Authorized), &store, &request(), &[]);
    assert_eq!(outcome.status, RunStatus::Error);
    assert!(outcome.message.contains("database unavailable"));
}

#[test]
fn malformed_input_is_a_single_error_message() {
    let mut req = request();
    req.players[3].id = req.players[2].id.clone();
    let store = RecordingStore::default();

    let outcome = run_season(&FixedAuth(AuthorizationStatus::Authorized), &store, &req, &[]);

    assert_eq!(outcome.status, RunStatus::Error);
    assert_eq!(outcome.message, "Duplicate player id 'p2'");
    assert!(outcome.plan.is_none());
}
