//! Guard-clause checks shared by every component. Each returns the first
//! structural problem found as a `SchedulerError`.

use crate::models::{
    Bye, DivisionConfig, GameAssignment, Player, SchedulerError, SharedSlotUsage, Slot, Team,
};
use std::collections::HashSet;

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Player must have an id, a division, a finite skill rating, and non-blank optional links.
pub fn validate_player(player: &Player) -> Result<(), SchedulerError> {
    let invalid = |reason: &str| SchedulerError::InvalidPlayer {
        player_id: player.id.clone(),
        reason: reason.to_string(),
    };
    if is_blank(&player.id) {
        return Err(invalid("missing id"));
    }
    if is_blank(&player.division) {
        return Err(invalid("missing division"));
    }
    if !player.skill_rating.is_finite() {
        return Err(invalid("skill rating must be a finite number"));
    }
    let links = [
        ("buddy id", &player.buddy_id),
        ("coach id", &player.coach_id),
        ("assistant coach id", &player.assistant_coach_id),
    ];
    for (label, link) in links {
        if link.as_deref().is_some_and(is_blank) {
            return Err(invalid(&format!("blank {}", label)));
        }
    }
    Ok(())
}

/// Validate every player and reject duplicate ids across the whole list.
pub fn validate_players(players: &[Player]) -> Result<(), SchedulerError> {
    let mut seen = HashSet::new();
    for p in players {
        validate_player(p)?;
        if !seen.insert(p.id.as_str()) {
            return Err(SchedulerError::DuplicatePlayerId(p.id.clone()));
        }
    }
    Ok(())
}

pub fn validate_division_config(
    division: &str,
    config: &DivisionConfig,
) -> Result<(), SchedulerError> {
    let invalid = |reason: &str| SchedulerError::InvalidDivisionConfig {
        division: division.to_string(),
        reason: reason.to_string(),
    };
    if config.max_roster_size == 0 {
        return Err(invalid("max roster size must be positive"));
    }
    if config.target_team_size == Some(0) {
        return Err(invalid("target team size must be positive"));
    }
    if config.team_count_override == Some(0) {
        return Err(invalid("team count override must be positive"));
    }
    Ok(())
}

/// Team must have an id and a division; ids must be unique.
pub fn validate_teams(teams: &[Team]) -> Result<(), SchedulerError> {
    let mut seen = HashSet::new();
    for t in teams {
        if is_blank(&t.id) {
            return Err(SchedulerError::InvalidTeam {
                team_id: t.id.clone(),
                reason: "missing id".to_string(),
            });
        }
        if is_blank(&t.division) {
            return Err(SchedulerError::InvalidTeam {
                team_id: t.id.clone(),
                reason: "missing division".to_string(),
            });
        }
        if !seen.insert(t.id.as_str()) {
            return Err(SchedulerError::DuplicateTeamId(t.id.clone()));
        }
    }
    Ok(())
}

pub fn validate_slot(slot: &Slot) -> Result<(), SchedulerError> {
    let invalid = |reason: &str| SchedulerError::InvalidSlot {
        slot_id: slot.id.clone(),
        reason: reason.to_string(),
    };
    if is_blank(&slot.id) {
        return Err(invalid("missing id"));
    }
    if slot.week_index == 0 {
        return Err(invalid("week index must be positive"));
    }
    if slot.end <= slot.start {
        return Err(invalid("end must be after start"));
    }
    if slot.division.as_deref().is_some_and(is_blank) {
        return Err(invalid("blank division"));
    }
    Ok(())
}

pub fn validate_slots(slots: &[Slot]) -> Result<(), SchedulerError> {
    let mut seen = HashSet::new();
    for s in slots {
        validate_slot(s)?;
        if !seen.insert(s.id.as_str()) {
            return Err(SchedulerError::DuplicateSlotId(s.id.clone()));
        }
    }
    Ok(())
}

/// Structural checks only; overlaps and other undesirable schedules are not errors.
pub fn validate_assignment(assignment: &GameAssignment) -> Result<(), SchedulerError> {
    let invalid = |reason: &str| SchedulerError::InvalidAssignment {
        key: assignment.key(),
        reason: reason.to_string(),
    };
    if is_blank(&assignment.slot_id) {
        return Err(invalid("missing slot id"));
    }
    if is_blank(&assignment.division) {
        return Err(invalid("missing division"));
    }
    if is_blank(&assignment.home_team_id) || is_blank(&assignment.away_team_id) {
        return Err(invalid("missing team id"));
    }
    if assignment.week_index == 0 {
        return Err(invalid("week index must be positive"));
    }
    if assignment.end <= assignment.start {
        return Err(invalid("end must be after start"));
    }
    Ok(())
}

pub fn validate_bye(bye: &Bye) -> Result<(), SchedulerError> {
    let invalid = |reason: &str| SchedulerError::InvalidBye {
        team_id: bye.team_id.clone(),
        reason: reason.to_string(),
    };
    if is_blank(&bye.team_id) {
        return Err(invalid("missing team id"));
    }
    if is_blank(&bye.division) {
        return Err(invalid("missing division"));
    }
    if bye.week_index == 0 {
        return Err(invalid("week index must be positive"));
    }
    Ok(())
}

/// Usage record must name its slot and week, and its total must match the per-division counts.
pub fn validate_shared_usage(usage: &SharedSlotUsage) -> Result<(), SchedulerError> {
    let invalid = |reason: String| SchedulerError::InvalidSharedUsage {
        slot_id: usage.slot_id.clone(),
        reason,
    };
    if is_blank(&usage.slot_id) {
        return Err(invalid("missing slot id".to_string()));
    }
    if usage.field_id.as_deref().is_some_and(is_blank) {
        return Err(invalid("blank field id".to_string()));
    }
    if usage.week_index == 0 {
        return Err(invalid("week index must be positive".to_string()));
    }
    if usage.division_usage.iter().any(|u| is_blank(&u.division)) {
        return Err(invalid("division usage entry is missing its division".to_string()));
    }
    let summed: u32 = usage.division_usage.iter().map(|u| u.count).sum();
    if summed != usage.total_assignments {
        return Err(invalid(format!(
            "total assignments {} does not match division counts {}",
            usage.total_assignments, summed
        )));
    }
    Ok(())
}
