//! Integration tests for schedule evaluation: load metrics and warnings.

use chrono::{DateTime, Duration, TimeZone, Utc};
use league_scheduler_web::models::DivisionUsage;
use league_scheduler_web::{
    evaluate_schedule, generate_division_fixtures, schedule_games, Bye, EvaluationInput,
    GameAssignment, Matchup, SchedulerError, SharedSlotUsage, Slot, Team, UnscheduledEntry,
    UnscheduledReason, WarningKind,
};

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 2, hour, minute, 0).unwrap()
}

fn game(slot: &str, field: Option<&str>, home: &str, away: &str, start: DateTime<Utc>) -> GameAssignment {
    GameAssignment {
        week_index: 1,
        division: "U10".to_string(),
        slot_id: slot.to_string(),
        start,
        end: start + Duration::minutes(60),
        home_team_id: home.to_string(),
        away_team_id: away.to_string(),
        field_id: field.map(str::to_string),
    }
}

fn directory() -> Vec<Team> {
    ["A", "B", "C", "D", "E"]
        .iter()
        .map(|id| Team::new(*id, format!("Team {id}"), "U10"))
        .collect()
}

fn input<'a>(assignments: &'a [GameAssignment], teams: &'a [Team]) -> EvaluationInput<'a> {
    EvaluationInput {
        assignments,
        teams,
        byes: &[],
        unscheduled: &[],
        shared_slot_usage: None,
    }
}

#[test]
fn overlapping_games_on_one_field_warn_once() {
    let teams = directory();
    let games = vec![
        game("s1", Some("F1"), "A", "B", at(9, 0)),
        game("s2", Some("F1"), "C", "D", at(9, 30)),
    ];

    let eval = evaluate_schedule(input(&games, &teams)).unwrap();

    let field: Vec<_> = eval.warnings_of(WarningKind::FieldOverlap).collect();
    assert_eq!(field.len(), 1);
    assert!(field[0].message.contains(&games[0].key()));
    assert!(field[0].message.contains(&games[1].key()));
    assert_eq!(eval.warnings_of(WarningKind::TeamOverlap).count(), 0);
}

#[test]
fn back_to_back_games_do_not_overlap() {
    let teams = directory();
    let games = vec![
        game("s1", Some("F1"), "A", "B", at(9, 0)),
        game("s2", Some("F1"), "A", "C", at(10, 0)),
    ];
    let eval = evaluate_schedule(input(&games, &teams)).unwrap();
    assert!(eval.warnings.is_empty());
}

#[test]
fn team_and_coach_overlaps_are_detected() {
    let mut teams = directory();
    teams[1].coach_id = Some("lee".into());
    teams[3].coach_id = Some("lee".into());
    let games = vec![
        game("s1", Some("F1"), "A", "B", at(9, 0)),
        game("s2", Some("F2"), "A", "C", at(9, 15)),
        game("s3", Some("F3"), "D", "E", at(9, 45)),
    ];

    let eval = evaluate_schedule(input(&games, &teams)).unwrap();

    let team: Vec<_> = eval.warnings_of(WarningKind::TeamOverlap).collect();
    assert_eq!(team.len(), 1);
    assert_eq!(team[0].details["id"], "A");
    let coach: Vec<_> = eval.warnings_of(WarningKind::CoachOverlap).collect();
    assert_eq!(coach.len(), 1);
    assert_eq!(coach[0].details["id"], "lee");
    assert_eq!(eval.warnings_of(WarningKind::FieldOverlap).count(), 0);
}

#[test]
fn uneven_shared_field_is_flagged() {
    let teams = directory();
    let usage = vec![SharedSlotUsage {
        slot_id: "shared-1".to_string(),
        field_id: Some("F9".to_string()),
        week_index: 1,
        division_usage: vec![
            DivisionUsage { division: "U10".to_string(), count: 3 },
            DivisionUsage { division: "U12".to_string(), count: 1 },
        ],
        total_assignments: 4,
    }];
    let eval = evaluate_schedule(EvaluationInput {
        shared_slot_usage: Some(&usage),
        ..input(&[], &teams)
    })
    .unwrap();

    let imbalance: Vec<_> = eval.warnings_of(WarningKind::SharedSlotImbalance).collect();
    assert_eq!(imbalance.len(), 1);
    assert_eq!(imbalance[0].details["fieldId"], "F9");
    assert_eq!(imbalance[0].details["spread"], 2);
}

#[test]
fn near_even_shared_field_is_fine() {
    let teams = directory();
    let usage = vec![SharedSlotUsage {
        slot_id: "shared-1".to_string(),
        field_id: Some("F9".to_string()),
        week_index: 1,
        division_usage: vec![
            DivisionUsage { division: "U10".to_string(), count: 2 },
            DivisionUsage { division: "U12".to_string(), count: 1 },
        ],
        total_assignments: 3,
    }];
    let eval = evaluate_schedule(EvaluationInput {
        shared_slot_usage: Some(&usage),
        ..input(&[], &teams)
    })
    .unwrap();
    assert_eq!(eval.warnings_of(WarningKind::SharedSlotImbalance).count(), 0);
}

#[test]
fn unscheduled_matchups_are_summarised() {
    let teams = directory();
    let unscheduled = vec![
        UnscheduledEntry {
            week_index: 1,
            division: "U10".to_string(),
            matchup: Matchup::new("A", "B"),
            reason: UnscheduledReason::NoSlotAvailable,
        },
        UnscheduledEntry {
            week_index: 2,
            division: "U10".to_string(),
            matchup: Matchup::new("C", "D"),
            reason: UnscheduledReason::NoSlotAvailable,
        },
        UnscheduledEntry {
            week_index: 2,
            division: "U12".to_string(),
            matchup: Matchup::new("X", "Y"),
            reason: UnscheduledReason::CoachSchedulingConflict,
        },
    ];
    let eval = evaluate_schedule(EvaluationInput {
        unscheduled: &unscheduled,
        ..input(&[], &teams)
    })
    .unwrap();

    let w: Vec<_> = eval.warnings_of(WarningKind::UnscheduledMatchups).collect();
    assert_eq!(w.len(), 1);
    assert_eq!(
        w[0].message,
        "3 matchups unscheduled: coach-scheduling-conflict: 1, no-slot-available: 2"
    );
    assert_eq!(eval.unscheduled_by_reason["no-slot-available"], 2);
    assert_eq!(eval.unscheduled_by_division["U12"], 1);
}

#[test]
fn team_load_counts_home_away_and_idle_teams() {
    let teams = directory();
    let games = vec![
        game("s1", Some("F1"), "A", "B", at(9, 0)),
        GameAssignment { week_index: 2, ..game("s2", Some("F2"), "C", "A", at(11, 0)) },
    ];
    let byes = vec![Bye { week_index: 1, division: "U10".to_string(), team_id: "E".to_string() }];

    let eval = evaluate_schedule(EvaluationInput { byes: &byes, ..input(&games, &teams) }).unwrap();

    let a = eval.teams.iter().find(|t| t.team_id == "A").unwrap();
    assert_eq!((a.games, a.home_games, a.away_games), (2, 1, 1));
    assert_eq!(a.unique_fields, 2);
    assert_eq!(a.weeks_played, vec![1, 2]);
    assert_eq!(a.earliest_start, Some(at(9, 0)));
    assert_eq!(a.latest_start, Some(at(11, 0)));
    let e = eval.teams.iter().find(|t| t.team_id == "E").unwrap();
    assert_eq!(e.games, 0);
    assert_eq!(eval.byes_by_division["U10"], 1);
    assert_eq!(eval.divisions[0].games, 2);
    assert_eq!(eval.divisions[0].teams_involved, 3);
    assert_eq!(eval.fields.len(), 2);
}

#[test]
fn malformed_assignment_is_an_error() {
    let teams = directory();
    let mut bad = game("s1", None, "A", "B", at(9, 0));
    bad.end = bad.start;
    assert!(matches!(
        evaluate_schedule(input(&[bad], &teams)),
        Err(SchedulerError::InvalidAssignment { .. })
    ));
    let blank = game("s1", None, "", "B", at(9, 0));
    assert!(matches!(
        evaluate_schedule(input(&[blank], &teams)),
        Err(SchedulerError::InvalidAssignment { .. })
    ));
}

#[test]
fn malformed_shared_usage_is_an_error() {
    let teams = directory();
    let record = SharedSlotUsage {
        slot_id: "shared-1".to_string(),
        field_id: Some("F9".to_string()),
        week_index: 1,
        division_usage: vec![
            DivisionUsage { division: "U10".to_string(), count: 3 },
            DivisionUsage { division: "U12".to_string(), count: 1 },
        ],
        total_assignments: 4,
    };
    let broken = [
        SharedSlotUsage { slot_id: String::new(), ..record.clone() },
        SharedSlotUsage { week_index: 0, ..record.clone() },
        SharedSlotUsage { total_assignments: 99, ..record.clone() },
        SharedSlotUsage {
            division_usage: vec![DivisionUsage { division: " ".to_string(), count: 4 }],
            ..record.clone()
        },
    ];

    for usage in broken {
        let usage = [usage];
        let result = evaluate_schedule(EvaluationInput {
            shared_slot_usage: Some(&usage),
            ..input(&[], &teams)
        });
        assert!(
            matches!(result, Err(SchedulerError::InvalidSharedUsage { .. })),
            "{:?}",
            usage
        );
    }
}

#[test]
fn bye_in_week_zero_is_an_error() {
    let teams = directory();
    let byes = vec![Bye { week_index: 0, division: "U10".to_string(), team_id: "E".to_string() }];
    assert!(matches!(
        evaluate_schedule(EvaluationInput { byes: &byes, ..input(&[], &teams) }),
        Err(SchedulerError::InvalidBye { .. })
    ));
}

#[test]
fn evaluating_twice_gives_the_same_answer() {
    let mut teams: Vec<Team> = (1..=5).map(|i| Team::new(format!("U10-{i}"), "T", "U10")).collect();
    teams[0].coach_id = Some("ann".into());
    let fixtures = generate_division_fixtures(&teams).unwrap();
    let slots: Vec<Slot> = (1..=5)
        .map(|w| {
            let start = at(9, 0) + Duration::weeks(w as i64);
            Slot::new(format!("s{w}"), w, start, start + Duration::minutes(60), 1).on_field("F1")
        })
        .collect();
    let schedule = schedule_games(&teams, &slots, &fixtures).unwrap();

    let first = evaluate_schedule(EvaluationInput::from_schedule(&schedule, &teams)).unwrap();
    let second = evaluate_schedule(EvaluationInput::from_schedule(&schedule, &teams)).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.warnings_of(WarningKind::FieldOverlap).count(), 0);
    assert_eq!(first.warnings_of(WarningKind::UnscheduledMatchups).count(), 1);
    assert_eq!(first.total_games, 5);
}
