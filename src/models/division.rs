//! Per-division sizing and naming policy.

use serde::{Deserialize, Serialize};

/// Sizing and naming for the teams of one division.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct DivisionConfig {
    /// Hard cap on players per team. Must be positive.
    pub max_roster_size: u32,
    /// Preferred players per team; falls back to `max_roster_size`.
    #[serde(default)]
    pub target_team_size: Option<u32>,
    /// Minimum team count regardless of player numbers.
    #[serde(default)]
    pub team_count_override: Option<u32>,
    /// Explicit names, used in team creation order.
    #[serde(default)]
    pub team_names: Vec<String>,
    #[serde(default)]
    pub team_name_prefix: Option<String>,
}

impl DivisionConfig {
    pub fn new(max_roster_size: u32) -> Self {
        Self {
            max_roster_size,
            target_team_size: None,
            team_count_override: None,
            team_names: Vec::new(),
            team_name_prefix: None,
        }
    }

    pub fn with_target_team_size(mut self, size: u32) -> Self {
        self.target_team_size = Some(size);
        self
    }

    pub fn with_team_count(mut self, count: u32) -> Self {
        self.team_count_override = Some(count);
        self
    }

    pub fn with_team_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.team_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Team count needed for `player_count` players and `coach_count` distinct head coaches.
    ///
    /// max(coaches, ceil(players / target), override), then raised until no team
    /// would exceed `max_roster_size`.
    pub fn required_team_count(&self, player_count: usize, coach_count: usize) -> usize {
        if player_count == 0 {
            return 0;
        }
        let max = self.max_roster_size.max(1) as usize;
        let target = self.target_team_size.filter(|t| *t > 0).map(|t| t as usize).unwrap_or(max);
        let by_size = player_count.div_ceil(target);
        let override_count = self.team_count_override.unwrap_or(0) as usize;
        let required = coach_count.max(by_size).max(override_count).max(1);
        required.max(player_count.div_ceil(max))
    }

    /// Display name for the team created at `index` (0-based).
    pub fn team_name(&self, division: &str, index: usize) -> String {
        if let Some(name) = self.team_names.get(index) {
            return name.clone();
        }
        match &self.team_name_prefix {
            Some(prefix) => format!("{} {}", prefix, index + 1),
            None => format!("{} Team {}", division, index + 1),
        }
    }
}
