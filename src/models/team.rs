//! Generated teams, overflow entries and team generation summaries.

use crate::models::player::{CoachId, DivisionId, Player, PlayerId, UnmatchedBuddyRequest};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Unique identifier for a team, e.g. "U10-team-3".
pub type TeamId = String;

/// A generated roster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub division: DivisionId,
    #[serde(default)]
    pub coach_id: Option<CoachId>,
    #[serde(default)]
    pub assistant_coach_ids: Vec<CoachId>,
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub skill_total: f64,
}

impl Team {
    pub fn new(
        id: impl Into<TeamId>,
        name: impl Into<String>,
        division: impl Into<DivisionId>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            division: division.into(),
            coach_id: None,
            assistant_coach_ids: Vec::new(),
            players: Vec::new(),
            skill_total: 0.0,
        }
    }

    pub fn with_coach(mut self, coach_id: impl Into<CoachId>) -> Self {
        self.coach_id = Some(coach_id.into());
        self
    }

    /// Mean skill of current players (0 for an empty roster).
    pub fn average_skill(&self) -> f64 {
        if self.players.is_empty() {
            0.0
        } else {
            self.skill_total / self.players.len() as f64
        }
    }

    /// True if `extra` more players still fit under `max_roster_size`.
    pub fn has_room_for(&self, extra: usize, max_roster_size: u32) -> bool {
        self.players.len() + extra <= max_roster_size as usize
    }

    /// Add players and keep `skill_total` in sync.
    pub fn add_players(&mut self, players: &[Player]) {
        for p in players {
            self.skill_total += p.skill_rating;
            self.players.push(p.clone());
        }
    }

    /// Record an assistant coach once; the head coach is never listed as an assistant.
    pub fn add_assistant(&mut self, coach_id: &str) {
        if self.coach_id.as_deref() == Some(coach_id) {
            return;
        }
        if !self.assistant_coach_ids.iter().any(|c| c == coach_id) {
            self.assistant_coach_ids.push(coach_id.to_string());
        }
    }
}

/// Why a unit could not be placed on any team.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum OverflowReason {
    /// The coach's team had no room left.
    #[serde(rename = "coach-capacity")]
    CoachCapacity,
    /// A buddy pair did not fit on any team together.
    #[serde(rename = "buddy request")]
    BuddyRequest,
    /// A single player did not fit anywhere.
    #[serde(rename = "capacity")]
    Capacity,
}

impl OverflowReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverflowReason::CoachCapacity => "coach-capacity",
            OverflowReason::BuddyRequest => "buddy request",
            OverflowReason::Capacity => "capacity",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct OverflowMetadata {
    pub division: DivisionId,
    pub unit_size: usize,
    pub coach_id: Option<CoachId>,
    /// Teams that existed when placement was attempted.
    pub teams_considered: usize,
}

/// A unit left off every roster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverflowEntry {
    pub players: Vec<Player>,
    pub reason: OverflowReason,
    pub metadata: OverflowMetadata,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct CoachCoverage {
    pub teams_with_coach: usize,
    pub teams_without_coach: usize,
    pub uncoached_team_ids: Vec<TeamId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeamFill {
    pub team_id: TeamId,
    pub players: usize,
    /// players / max_roster_size, in 0.0..=1.0.
    pub fill_rate: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterBalance {
    pub max_roster_size: u32,
    pub min_players: usize,
    pub max_players: usize,
    pub teams: Vec<TeamFill>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillBalance {
    pub min_average: f64,
    pub max_average: f64,
    pub spread: f64,
}

/// Summary of one division's generated teams.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DivisionSummary {
    pub division: DivisionId,
    pub player_count: usize,
    pub team_count: usize,
    pub coach_coverage: CoachCoverage,
    pub roster_balance: RosterBalance,
    pub skill_balance: SkillBalance,
    pub overflow_by_reason: BTreeMap<String, usize>,
}

/// Output of team generation across all divisions.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamGenerationResult {
    pub teams: Vec<Team>,
    pub overflow: Vec<OverflowEntry>,
    pub unmatched_requests: Vec<UnmatchedBuddyRequest>,
    pub divisions: Vec<DivisionSummary>,
    pub overflow_by_reason: BTreeMap<String, usize>,
}

/// Flattened team record for the persistence collaborator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeamRow {
    pub team_id: TeamId,
    pub name: String,
    pub division: DivisionId,
    pub coach_id: Option<CoachId>,
    pub assistant_coach_ids: Vec<CoachId>,
    pub player_count: usize,
    pub skill_total: f64,
}

/// One player-on-team membership for the persistence collaborator.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TeamPlayerRow {
    pub team_id: TeamId,
    pub player_id: PlayerId,
}

impl TeamGenerationResult {
    pub fn team_rows(&self) -> Vec<TeamRow> {
        self.teams
            .iter()
            .map(|t| TeamRow {
                team_id: t.id.clone(),
                name: t.name.clone(),
                division: t.division.clone(),
                coach_id: t.coach_id.clone(),
                assistant_coach_ids: t.assistant_coach_ids.clone(),
                player_count: t.players.len(),
                skill_total: t.skill_total,
            })
            .collect()
    }

    pub fn team_player_rows(&self) -> Vec<TeamPlayerRow> {
        self.teams
            .iter()
            .flat_map(|t| {
                t.players.iter().map(move |p| TeamPlayerRow {
                    team_id: t.id.clone(),
                    player_id: p.id.clone(),
                })
            })
            .collect()
    }

    /// Team that holds `player_id`, if any.
    pub fn team_of(&self, player_id: &str) -> Option<&Team> {
        self.teams
            .iter()
            .find(|t| t.players.iter().any(|p| p.id == player_id))
    }
}
