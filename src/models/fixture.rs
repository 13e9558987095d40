//! Round robin fixtures: unplaced home/away pairings grouped by week.

use crate::models::team::TeamId;
use serde::{Deserialize, Serialize};

/// A home/away pairing not yet bound to a slot.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Matchup {
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
}

impl Matchup {
    pub fn new(home_team_id: impl Into<TeamId>, away_team_id: impl Into<TeamId>) -> Self {
        Self {
            home_team_id: home_team_id.into(),
            away_team_id: away_team_id.into(),
        }
    }

    /// Lower-sorted id becomes home.
    pub fn canonical(a: &str, b: &str) -> Self {
        if a <= b {
            Self::new(a, b)
        } else {
            Self::new(b, a)
        }
    }

    pub fn involves(&self, team_id: &str) -> bool {
        self.home_team_id == team_id || self.away_team_id == team_id
    }
}

/// One round of a division's round robin. Week indexes start at 1.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundRobinWeek {
    pub week_index: u32,
    pub matchups: Vec<Matchup>,
    pub byes: Vec<TeamId>,
}
