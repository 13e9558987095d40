//! SchedulerError: structural violations that abort a whole call.

/// Errors raised for malformed input. Infeasible placements are never errors;
/// they come back as overflow, unscheduled or warning entries instead.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SchedulerError {
    /// A player record is missing a required field or carries an invalid value.
    InvalidPlayer { player_id: String, reason: String },
    /// Two players share the same id.
    DuplicatePlayerId(String),
    /// Players exist for a division that has no config.
    MissingDivisionConfig(String),
    /// Division config has a non-positive size or count.
    InvalidDivisionConfig { division: String, reason: String },
    /// One buddy unit names two different head coaches.
    ConflictingCoaches {
        player_ids: Vec<String>,
        coach_ids: Vec<String>,
    },
    /// Round robin needs at least two teams.
    NotEnoughTeams { found: usize },
    /// Two teams share the same id.
    DuplicateTeamId(String),
    /// A team record is missing an id or division.
    InvalidTeam { team_id: String, reason: String },
    /// A slot record is malformed (missing id, week 0, end <= start).
    InvalidSlot { slot_id: String, reason: String },
    /// Two slots share the same id.
    DuplicateSlotId(String),
    /// An assignment record handed to evaluation is malformed.
    InvalidAssignment { key: String, reason: String },
    /// A bye record handed to evaluation is malformed.
    InvalidBye { team_id: String, reason: String },
    /// A shared-slot usage record handed to evaluation is malformed.
    InvalidSharedUsage { slot_id: String, reason: String },
    /// Registration CSV could not be read.
    Csv(String),
}

impl std::fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedulerError::InvalidPlayer { player_id, reason } => {
                write!(f, "Invalid player '{}': {}", player_id, reason)
            }
            SchedulerError::DuplicatePlayerId(id) => write!(f, "Duplicate player id '{}'", id),
            SchedulerError::MissingDivisionConfig(division) => {
                write!(f, "No configuration for division '{}'", division)
            }
            SchedulerError::InvalidDivisionConfig { division, reason } => {
                write!(f, "Invalid config for division '{}': {}", division, reason)
            }
            SchedulerError::ConflictingCoaches {
                player_ids,
                coach_ids,
            } => write!(
                f,
                "Buddy unit [{}] references conflicting coaches [{}]",
                player_ids.join(", "),
                coach_ids.join(", ")
            ),
            SchedulerError::NotEnoughTeams { found } => {
                write!(f, "Need at least 2 teams for a round robin (found {})", found)
            }
            SchedulerError::DuplicateTeamId(id) => write!(f, "Duplicate team id '{}'", id),
            SchedulerError::InvalidTeam { team_id, reason } => {
                write!(f, "Invalid team '{}': {}", team_id, reason)
            }
            SchedulerError::InvalidSlot { slot_id, reason } => {
                write!(f, "Invalid slot '{}': {}", slot_id, reason)
            }
            SchedulerError::DuplicateSlotId(id) => write!(f, "Duplicate slot id '{}'", id),
            SchedulerError::InvalidAssignment { key, reason } => {
                write!(f, "Invalid assignment '{}': {}", key, reason)
            }
            SchedulerError::InvalidBye { team_id, reason } => {
                write!(f, "Invalid bye for team '{}': {}", team_id, reason)
            }
            SchedulerError::InvalidSharedUsage { slot_id, reason } => {
                write!(f, "Invalid shared usage for slot '{}': {}", slot_id, reason)
            }
            SchedulerError::Csv(msg) => write!(f, "Could not read registration CSV: {}", msg),
        }
    }
}

impl std::error::Error for SchedulerError {}

impl From<csv::Error> for SchedulerError {
    fn from(err: csv::Error) -> Self {
        SchedulerError::Csv(err.to_string())
    }
}
