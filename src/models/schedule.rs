//! Game schedule output: assignments, byes, unscheduled fixtures, shared slot usage.

use crate::models::fixture::Matchup;
use crate::models::player::DivisionId;
use crate::models::slot::{FieldId, SlotId};
use crate::models::team::TeamId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A fixture bound to a slot.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameAssignment {
    pub week_index: u32,
    pub division: DivisionId,
    pub slot_id: SlotId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    #[serde(default)]
    pub field_id: Option<FieldId>,
}

impl GameAssignment {
    /// Stable identifier used in warnings: `w<week>:<slot>:<home>-vs-<away>`.
    pub fn key(&self) -> String {
        format!(
            "w{}:{}:{}-vs-{}",
            self.week_index, self.slot_id, self.home_team_id, self.away_team_id
        )
    }

    pub fn team_ids(&self) -> [&str; 2] {
        [&self.home_team_id, &self.away_team_id]
    }
}

/// A team without a fixture in a given week.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bye {
    pub week_index: u32,
    pub division: DivisionId,
    pub team_id: TeamId,
}

/// Why a fixture was not placed.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnscheduledReason {
    UnknownTeam,
    DivisionMismatch,
    DuplicateMatchup,
    CoachCoachesBothTeams,
    CoachSchedulingConflict,
    NoSlotAvailable,
}

impl UnscheduledReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnscheduledReason::UnknownTeam => "unknown-team",
            UnscheduledReason::DivisionMismatch => "division-mismatch",
            UnscheduledReason::DuplicateMatchup => "duplicate-matchup",
            UnscheduledReason::CoachCoachesBothTeams => "coach-coaches-both-teams",
            UnscheduledReason::CoachSchedulingConflict => "coach-scheduling-conflict",
            UnscheduledReason::NoSlotAvailable => "no-slot-available",
        }
    }
}

impl std::fmt::Display for UnscheduledReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fixture that could not be placed.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct UnscheduledEntry {
    pub week_index: u32,
    pub division: DivisionId,
    pub matchup: Matchup,
    pub reason: UnscheduledReason,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct DivisionUsage {
    pub division: DivisionId,
    pub count: u32,
}

/// How divisions shared one shared slot. Counts sum to `total_assignments`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SharedSlotUsage {
    pub slot_id: SlotId,
    #[serde(default)]
    pub field_id: Option<FieldId>,
    pub week_index: u32,
    pub division_usage: Vec<DivisionUsage>,
    pub total_assignments: u32,
}

/// Output of slot allocation.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameScheduleResult {
    pub assignments: Vec<GameAssignment>,
    pub byes: Vec<Bye>,
    pub unscheduled: Vec<UnscheduledEntry>,
    pub shared_slot_usage: Vec<SharedSlotUsage>,
    /// Capacity left on every slot after allocation.
    pub remaining_capacity: BTreeMap<SlotId, u32>,
}
