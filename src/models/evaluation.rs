//! Schedule evaluation output: load metrics and advisory warnings.

use crate::models::player::DivisionId;
use crate::models::slot::FieldId;
use crate::models::team::TeamId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind of anomaly found in a schedule.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    TeamOverlap,
    CoachOverlap,
    FieldOverlap,
    SharedSlotImbalance,
    UnscheduledMatchups,
}

/// An advisory finding. Never fatal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    #[serde(rename = "type")]
    pub kind: WarningKind,
    pub message: String,
    pub details: serde_json::Value,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct DivisionLoad {
    pub division: DivisionId,
    pub games: usize,
    pub teams_involved: usize,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FieldLoad {
    pub field_id: FieldId,
    pub games: usize,
    pub divisions: Vec<DivisionId>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TeamLoad {
    pub team_id: TeamId,
    /// None when the team only appears in assignments, not in the directory.
    pub division: Option<DivisionId>,
    pub games: usize,
    pub home_games: usize,
    pub away_games: usize,
    pub unique_fields: usize,
    pub weeks_played: Vec<u32>,
    pub earliest_start: Option<DateTime<Utc>>,
    pub latest_start: Option<DateTime<Utc>>,
}

/// Summaries and warnings re-derived from a finished schedule.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEvaluation {
    pub total_games: usize,
    pub divisions: Vec<DivisionLoad>,
    pub fields: Vec<FieldLoad>,
    pub teams: Vec<TeamLoad>,
    pub byes_by_division: BTreeMap<DivisionId, usize>,
    pub unscheduled_by_reason: BTreeMap<String, usize>,
    pub unscheduled_by_division: BTreeMap<DivisionId, usize>,
    pub warnings: Vec<Warning>,
}

impl ScheduleEvaluation {
    pub fn warnings_of(&self, kind: WarningKind) -> impl Iterator<Item = &Warning> {
        self.warnings.iter().filter(move |w| w.kind == kind)
    }
}
