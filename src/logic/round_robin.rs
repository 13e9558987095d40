//! Round robin fixtures via the circle method.

use crate::models::{Matchup, RoundRobinWeek, SchedulerError, Team, TeamId};
use std::collections::{BTreeMap, HashSet};

/// Generate a single round robin for one division.
///
/// Teams are sorted, padded with a bye marker when odd, and the first team stays
/// fixed while the rest rotate one position per week. Every pair meets exactly once
/// over n-1 weeks (n after padding). Home is the lower id; each week's matchups are sorted.
pub fn generate_round_robin(team_ids: &[TeamId]) -> Result<Vec<RoundRobinWeek>, SchedulerError> {
    if team_ids.len() < 2 {
        return Err(SchedulerError::NotEnoughTeams {
            found: team_ids.len(),
        });
    }
    let mut seen = HashSet::new();
    for id in team_ids {
        if !seen.insert(id.as_str()) {
            return Err(SchedulerError::DuplicateTeamId(id.clone()));
        }
    }

    let mut circle: Vec<Option<&str>> = team_ids.iter().map(|id| Some(id.as_str())).collect();
    circle.sort();
    if circle.len() % 2 == 1 {
        circle.push(None);
    }
    let n = circle.len();

    let mut weeks = Vec::with_capacity(n - 1);
    for week in 0..n - 1 {
        let mut matchups = Vec::with_capacity(n / 2);
        let mut byes = Vec::new();
        for i in 0..n / 2 {
            match (circle[i], circle[n - 1 - i]) {
                (Some(a), Some(b)) => matchups.push(Matchup::canonical(a, b)),
                (Some(team), None) | (None, Some(team)) => byes.push(team.to_string()),
                (None, None) => {}
            }
        }
        matchups.sort();
        weeks.push(RoundRobinWeek {
            week_index: week as u32 + 1,
            matchups,
            byes,
        });
        circle[1..].rotate_right(1);
    }
    Ok(weeks)
}

/// Round robin per division for generated teams. Divisions with fewer than two
/// teams have nothing to play and are skipped.
pub fn generate_division_fixtures(
    teams: &[Team],
) -> Result<BTreeMap<String, Vec<RoundRobinWeek>>, SchedulerError> {
    let mut by_division: BTreeMap<&str, Vec<TeamId>> = BTreeMap::new();
    for t in teams {
        by_division.entry(t.division.as_str()).or_default().push(t.id.clone());
    }

    let mut fixtures = BTreeMap::new();
    for (division, ids) in by_division {
        if ids.len() < 2 {
            log::warn!("Division {} has {} team(s); no fixtures generated", division, ids.len());
            continue;
        }
        let weeks = generate_round_robin(&ids)?;
        log::debug!("Division {}: {} teams, {} weeks", division, ids.len(), weeks.len());
        fixtures.insert(division.to_string(), weeks);
    }
    Ok(fixtures)
}
