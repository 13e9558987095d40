//! Season run: the full pipeline (teams, fixtures, slots, evaluation) wrapped in
//! the contract the surrounding system expects. Authorization and persistence are
//! collaborators behind traits; pending manual overrides block persistence.

use crate::logic::allocation::schedule_games;
use crate::logic::evaluation::{evaluate_schedule, EvaluationInput};
use crate::logic::round_robin::generate_division_fixtures;
use crate::logic::teams::generate_teams_seeded;
use crate::models::{
    AuthorizationStatus, GameScheduleResult, ManualOverride, OverrideStatus, RunMetrics,
    RunParameters, RunSnapshot, RunStatus, ScheduleEvaluation, SchedulerError, SeasonRunRequest,
    TeamGenerationResult,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Decides whether the caller may run the scheduler.
pub trait Authorizer {
    fn authorize(&self) -> AuthorizationStatus;
}

/// Persistence collaborator: stores a finished run.
pub trait SnapshotStore {
    fn save_snapshot(&self, snapshot: &RunSnapshot) -> Result<(), String>;
}

/// Everything produced by the engine for one season, before persistence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeasonPlan {
    pub teams: TeamGenerationResult,
    pub schedule: GameScheduleResult,
    pub evaluation: ScheduleEvaluation,
    pub fixture_count: usize,
}

/// Result handed back to the request layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub status: RunStatus,
    pub message: String,
    pub snapshot: Option<RunSnapshot>,
    pub plan: Option<SeasonPlan>,
}

impl RunOutcome {
    fn without_plan(status: RunStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            snapshot: None,
            plan: None,
        }
    }
}

/// Run the engine end to end without any collaborator.
pub fn plan_season(request: &SeasonRunRequest) -> Result<SeasonPlan, SchedulerError> {
    let teams =
        generate_teams_seeded(&request.players, &request.divisions, request.seed.as_deref())?;
    let fixtures = generate_division_fixtures(&teams.teams)?;
    let fixture_count = fixtures
        .values()
        .flat_map(|weeks| weeks.iter())
        .map(|w| w.matchups.len())
        .sum();
    let schedule = schedule_games(&teams.teams, &request.slots, &fixtures)?;
    let evaluation = evaluate_schedule(EvaluationInput::from_schedule(&schedule, &teams.teams))?;
    Ok(SeasonPlan {
        teams,
        schedule,
        evaluation,
        fixture_count,
    })
}

pub fn pending_override_count(overrides: &[ManualOverride]) -> usize {
    overrides
        .iter()
        .filter(|o| o.status == OverrideStatus::Pending)
        .count()
}

/// Authorize, plan, gate on pending overrides, then persist.
pub fn run_season(
    authorizer: &dyn Authorizer,
    store: &dyn SnapshotStore,
    request: &SeasonRunRequest,
    overrides: &[ManualOverride],
) -> RunOutcome {
    match authorizer.authorize() {
        AuthorizationStatus::Authorized => {}
        AuthorizationStatus::Unauthorized => {
            return RunOutcome::without_plan(
                RunStatus::Unauthorized,
                "Sign in to generate a schedule",
            )
        }
        AuthorizationStatus::Forbidden => {
            return RunOutcome::without_plan(
                RunStatus::Forbidden,
                "Only league administrators can generate a schedule",
            )
        }
    }

    let plan = match plan_season(request) {
        Ok(plan) => plan,
        Err(e) => {
            log::error!("Season {} run failed: {}", request.season_id, e);
            return RunOutcome::without_plan(RunStatus::Error, e.to_string());
        }
    };
    let snapshot = build_snapshot(request, &plan);

    let pending = pending_override_count(overrides);
    if pending > 0 {
        log::warn!(
            "Season {} run blocked by {} pending override(s)",
            request.season_id,
            pending
        );
        return RunOutcome {
            status: RunStatus::Blocked,
            message: format!("{} pending override(s) must be resolved before saving", pending),
            snapshot: None,
            plan: Some(plan),
        };
    }

    if let Err(e) = store.save_snapshot(&snapshot) {
        log::error!("Season {} snapshot not saved: {}", request.season_id, e);
        return RunOutcome {
            status: RunStatus::Error,
            message: format!("Could not save schedule: {}", e),
            snapshot: None,
            plan: Some(plan),
        };
    }

    log::info!("Season {} run {} saved", request.season_id, snapshot.run_id);
    RunOutcome {
        status: RunStatus::Success,
        message: describe_diagnostics(&plan),
        snapshot: Some(snapshot),
        plan: Some(plan),
    }
}

fn build_snapshot(request: &SeasonRunRequest, plan: &SeasonPlan) -> RunSnapshot {
    RunSnapshot {
        run_id: Uuid::new_v4(),
        season_id: request.season_id.clone(),
        parameters: RunParameters {
            seed: request.seed.clone(),
            divisions: request.divisions.clone(),
            player_count: request.players.len(),
            slot_count: request.slots.len(),
        },
        metrics: RunMetrics {
            teams: plan.teams.teams.len(),
            overflow: plan.teams.overflow.len(),
            unmatched_requests: plan.teams.unmatched_requests.len(),
            fixtures: plan.fixture_count,
            assignments: plan.schedule.assignments.len(),
            byes: plan.schedule.byes.len(),
            unscheduled: plan.schedule.unscheduled.len(),
            warnings: plan.evaluation.warnings.len(),
        },
        created_at: Utc::now(),
        team_rows: plan.teams.team_rows(),
        team_player_rows: plan.teams.team_player_rows(),
        assignment_rows: plan.schedule.assignments.clone(),
    }
}

/// One line per non-empty diagnostic list,
/// e.g. "3 matchups unscheduled: no-slot-available: 2, ...".
fn describe_diagnostics(plan: &SeasonPlan) -> String {
    let mut lines = vec![format!(
        "Scheduled {} of {} matchups for {} teams",
        plan.schedule.assignments.len(),
        plan.fixture_count,
        plan.teams.teams.len()
    )];
    if !plan.teams.overflow.is_empty() {
        let breakdown: Vec<String> = plan
            .teams
            .overflow_by_reason
            .iter()
            .map(|(reason, count)| format!("{}: {}", reason, count))
            .collect();
        lines.push(format!(
            "{} unit(s) not placed on a team: {}",
            plan.teams.overflow.len(),
            breakdown.join(", ")
        ));
    }
    if !plan.teams.unmatched_requests.is_empty() {
        lines.push(format!(
            "{} buddy request(s) could not be matched",
            plan.teams.unmatched_requests.len()
        ));
    }
    lines.extend(plan.evaluation.warnings.iter().map(|w| w.message.clone()));
    lines.join("\n")
}
