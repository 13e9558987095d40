//! Scheduling engine: validation, team generation, round robin, slot allocation,
//! evaluation, and the season run that ties them together.

mod allocation;
mod evaluation;
mod rng;
mod round_robin;
mod season;
mod teams;
pub mod validation;

pub use allocation::{
    by_consistency, by_field, by_field_usage, by_priority, by_slot_id, by_slot_usage, by_start,
    compare_candidates, schedule_games, Criterion, SlotCandidate, DIVISION_SLOT_ORDER,
    SHARED_SLOT_ORDER,
};
pub use evaluation::{evaluate_schedule, EvaluationInput};
pub use rng::{pick_index, SeededRng};
pub use round_robin::{generate_division_fixtures, generate_round_robin};
pub use season::{
    pending_override_count, plan_season, run_season, Authorizer, RunOutcome, SeasonPlan,
    SnapshotStore,
};
pub use teams::{build_units, generate_teams, generate_teams_seeded};
