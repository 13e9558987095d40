//! Youth league scheduler: library with models and the scheduling engine.

pub mod import;
pub mod logic;
pub mod models;

pub use import::players_from_csv;
pub use logic::{
    evaluate_schedule, generate_division_fixtures, generate_round_robin, generate_teams,
    generate_teams_seeded, plan_season, run_season, schedule_games, Authorizer, EvaluationInput,
    RunOutcome, SeasonPlan, SeededRng, SnapshotStore,
};
pub use models::{
    AuthorizationStatus, Bye, DivisionConfig, GameAssignment, GameScheduleResult, ManualOverride,
    Matchup, OverrideStatus, Player, PlayerId, RoundRobinWeek, RunSnapshot, RunStatus,
    ScheduleEvaluation, SchedulerError, SeasonRunRequest, SharedSlotUsage, Slot, Team, TeamId,
    TeamGenerationResult, UnscheduledEntry, UnscheduledReason, Warning, WarningKind,
};
