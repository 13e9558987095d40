//! Player registrations and the assignment units built from them.

use serde::{Deserialize, Serialize};

/// Unique identifier for a player (caller-supplied registration id).
pub type PlayerId = String;

/// Identifier for a head or assistant coach.
pub type CoachId = String;

/// Division name, e.g. "U10".
pub type DivisionId = String;

/// A registered player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    #[serde(default)]
    pub name: String,
    pub division: DivisionId,
    /// Requested buddy; honoured only when the request is mutual.
    #[serde(default)]
    pub buddy_id: Option<PlayerId>,
    /// Head coach this player (usually the coach's child) must play for.
    #[serde(default)]
    pub coach_id: Option<CoachId>,
    #[serde(default)]
    pub assistant_coach_id: Option<CoachId>,
    #[serde(default)]
    pub skill_rating: f64,
}

impl Player {
    /// Create a player with no buddy or coach link and a zero skill rating.
    pub fn new(
        id: impl Into<PlayerId>,
        name: impl Into<String>,
        division: impl Into<DivisionId>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            division: division.into(),
            buddy_id: None,
            coach_id: None,
            assistant_coach_id: None,
            skill_rating: 0.0,
        }
    }

    pub fn with_skill(mut self, skill_rating: f64) -> Self {
        self.skill_rating = skill_rating;
        self
    }

    pub fn with_buddy(mut self, buddy_id: impl Into<PlayerId>) -> Self {
        self.buddy_id = Some(buddy_id.into());
        self
    }

    pub fn with_coach(mut self, coach_id: impl Into<CoachId>) -> Self {
        self.coach_id = Some(coach_id.into());
        self
    }

    pub fn with_assistant_coach(mut self, coach_id: impl Into<CoachId>) -> Self {
        self.assistant_coach_id = Some(coach_id.into());
        self
    }
}

/// One or two players that must land on the same team.
#[derive(Clone, Debug, PartialEq)]
pub struct AssignmentUnit {
    pub players: Vec<Player>,
}

impl AssignmentUnit {
    pub fn single(player: Player) -> Self {
        Self {
            players: vec![player],
        }
    }

    pub fn pair(first: Player, second: Player) -> Self {
        Self {
            players: vec![first, second],
        }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn skill_total(&self) -> f64 {
        self.players.iter().map(|p| p.skill_rating).sum()
    }

    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id.clone()).collect()
    }

    /// Distinct head coach ids named by members, in member order.
    pub fn head_coach_ids(&self) -> Vec<CoachId> {
        let mut ids: Vec<CoachId> = Vec::new();
        for c in self.players.iter().filter_map(|p| p.coach_id.as_ref()) {
            if !ids.contains(c) {
                ids.push(c.clone());
            }
        }
        ids
    }

    /// Distinct assistant coach ids named by members, in member order.
    pub fn assistant_coach_ids(&self) -> Vec<CoachId> {
        let mut ids: Vec<CoachId> = Vec::new();
        for c in self.players.iter().filter_map(|p| p.assistant_coach_id.as_ref()) {
            if !ids.contains(c) {
                ids.push(c.clone());
            }
        }
        ids
    }

    pub fn has_coach_link(&self) -> bool {
        self.players
            .iter()
            .any(|p| p.coach_id.is_some() || p.assistant_coach_id.is_some())
    }
}

/// Why a buddy request could not be turned into a pair.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnmatchedReason {
    SelfReference,
    MissingTarget,
    NotReciprocal,
}

/// Diagnostic for a buddy request that was ignored.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct UnmatchedBuddyRequest {
    pub division: DivisionId,
    pub requester_id: PlayerId,
    pub target_id: PlayerId,
    pub reason: UnmatchedReason,
}
