//! Data records for the league scheduler: players, teams, slots, schedules, runs.

mod division;
mod error;
mod evaluation;
mod fixture;
mod player;
mod run;
mod schedule;
mod slot;
mod team;

pub use division::DivisionConfig;
pub use error::SchedulerError;
pub use evaluation::{DivisionLoad, FieldLoad, ScheduleEvaluation, TeamLoad, Warning, WarningKind};
pub use fixture::{Matchup, RoundRobinWeek};
pub use player::{
    AssignmentUnit, CoachId, DivisionId, Player, PlayerId, UnmatchedBuddyRequest, UnmatchedReason,
};
pub use run::{
    AuthorizationStatus, ManualOverride, OverrideStatus, RunId, RunMetrics, RunParameters,
    RunSnapshot, RunStatus, SeasonRunRequest,
};
pub use schedule::{
    Bye, DivisionUsage, GameAssignment, GameScheduleResult, SharedSlotUsage, UnscheduledEntry,
    UnscheduledReason,
};
pub use slot::{intervals_overlap, minute_of_day, FieldId, Slot, SlotId};
pub use team::{
    CoachCoverage, DivisionSummary, OverflowEntry, OverflowMetadata, OverflowReason,
    RosterBalance, SkillBalance, Team, TeamFill, TeamGenerationResult, TeamId, TeamPlayerRow,
    TeamRow,
};
