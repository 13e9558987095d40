//! Season run records exchanged with the surrounding system: authorization,
//! manual overrides, persistence snapshots and the response status.

use crate::models::division::DivisionConfig;
use crate::models::player::{DivisionId, Player};
use crate::models::schedule::GameAssignment;
use crate::models::slot::Slot;
use crate::models::team::{TeamPlayerRow, TeamRow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Unique identifier for a stored run.
pub type RunId = Uuid;

/// Answer from the authorization collaborator.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationStatus {
    Authorized,
    Unauthorized,
    Forbidden,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideStatus {
    #[default]
    Pending,
    Applied,
    Rejected,
}

/// A manual roster/schedule edit awaiting review. Applying it is the caller's job.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ManualOverride {
    pub id: String,
    #[serde(default)]
    pub status: OverrideStatus,
    #[serde(default)]
    pub note: Option<String>,
}

/// Response status surfaced by callers of a season run.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Success,
    Blocked,
    Unauthorized,
    Forbidden,
    Error,
}

/// Everything needed to generate one season.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeasonRunRequest {
    pub season_id: String,
    pub players: Vec<Player>,
    pub divisions: BTreeMap<DivisionId, DivisionConfig>,
    #[serde(default)]
    pub slots: Vec<Slot>,
    /// Seed for reproducible team generation.
    #[serde(default)]
    pub seed: Option<String>,
}

/// Inputs recorded alongside a snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunParameters {
    pub seed: Option<String>,
    pub divisions: BTreeMap<DivisionId, DivisionConfig>,
    pub player_count: usize,
    pub slot_count: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    pub teams: usize,
    pub overflow: usize,
    pub unmatched_requests: usize,
    pub fixtures: usize,
    pub assignments: usize,
    pub byes: usize,
    pub unscheduled: usize,
    pub warnings: usize,
}

/// What the persistence collaborator stores for a run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub run_id: RunId,
    pub season_id: String,
    pub parameters: RunParameters,
    pub metrics: RunMetrics,
    pub created_at: DateTime<Utc>,
    pub team_rows: Vec<TeamRow>,
    pub team_player_rows: Vec<TeamPlayerRow>,
    pub assignment_rows: Vec<GameAssignment>,
}
