//! Schedule evaluation: recompute load metrics and detect conflicts from a
//! finished assignment set, without trusting the allocator's own bookkeeping.

use crate::logic::validation::{
    validate_assignment, validate_bye, validate_shared_usage, validate_teams,
};
use crate::models::{
    DivisionLoad, FieldLoad, GameAssignment, GameScheduleResult, SchedulerError,
    ScheduleEvaluation, SharedSlotUsage, Team, TeamLoad, UnscheduledEntry, Warning, WarningKind,
    Bye,
};
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Everything evaluation looks at.
#[derive(Clone, Copy, Debug)]
pub struct EvaluationInput<'a> {
    pub assignments: &'a [GameAssignment],
    pub teams: &'a [Team],
    pub byes: &'a [Bye],
    pub unscheduled: &'a [UnscheduledEntry],
    pub shared_slot_usage: Option<&'a [SharedSlotUsage]>,
}

impl<'a> EvaluationInput<'a> {
    pub fn from_schedule(schedule: &'a GameScheduleResult, teams: &'a [Team]) -> Self {
        Self {
            assignments: &schedule.assignments,
            teams,
            byes: &schedule.byes,
            unscheduled: &schedule.unscheduled,
            shared_slot_usage: Some(&schedule.shared_slot_usage),
        }
    }
}

/// Evaluate a schedule. Fails only on malformed records; every undesirable
/// property of a valid schedule comes back as a warning.
pub fn evaluate_schedule(input: EvaluationInput<'_>) -> Result<ScheduleEvaluation, SchedulerError> {
    validate_teams(input.teams)?;
    for a in input.assignments {
        validate_assignment(a)?;
    }
    for bye in input.byes {
        validate_bye(bye)?;
    }
    for usage in input.shared_slot_usage.unwrap_or_default() {
        validate_shared_usage(usage)?;
    }

    let directory: HashMap<&str, &Team> = input.teams.iter().map(|t| (t.id.as_str(), t)).collect();

    let mut byes_by_division = BTreeMap::new();
    for bye in input.byes {
        *byes_by_division.entry(bye.division.clone()).or_insert(0) += 1;
    }
    let mut unscheduled_by_reason = BTreeMap::new();
    let mut unscheduled_by_division = BTreeMap::new();
    for entry in input.unscheduled {
        *unscheduled_by_reason.entry(entry.reason.as_str().to_string()).or_insert(0) += 1;
        *unscheduled_by_division.entry(entry.division.clone()).or_insert(0) += 1;
    }

    let mut warnings = Vec::new();
    warnings.extend(overlap_warnings(
        WarningKind::TeamOverlap,
        "Team",
        group_by_team(input.assignments),
    ));
    warnings.extend(overlap_warnings(
        WarningKind::CoachOverlap,
        "Coach",
        group_by_coach(input.assignments, &directory),
    ));
    warnings.extend(overlap_warnings(
        WarningKind::FieldOverlap,
        "Field",
        group_by_field(input.assignments),
    ));
    if let Some(usage) = input.shared_slot_usage {
        warnings.extend(shared_imbalance_warnings(usage));
    }
    if let Some(w) = unscheduled_warning(input.unscheduled.len(), &unscheduled_by_reason) {
        warnings.push(w);
    }

    let evaluation = ScheduleEvaluation {
        total_games: input.assignments.len(),
        divisions: division_loads(input.assignments),
        fields: field_loads(input.assignments),
        teams: team_loads(input.assignments, input.teams),
        byes_by_division,
        unscheduled_by_reason,
        unscheduled_by_division,
        warnings,
    };
    log::info!(
        "Evaluated {} games: {} warning(s)",
        evaluation.total_games,
        evaluation.warnings.len()
    );
    Ok(evaluation)
}

fn division_loads(assignments: &[GameAssignment]) -> Vec<DivisionLoad> {
    let mut acc: BTreeMap<&str, (usize, BTreeSet<&str>)> = BTreeMap::new();
    for a in assignments {
        let entry = acc.entry(a.division.as_str()).or_default();
        entry.0 += 1;
        entry.1.extend(a.team_ids());
    }
    acc.into_iter()
        .map(|(division, (games, teams))| DivisionLoad {
            division: division.to_string(),
            games,
            teams_involved: teams.len(),
        })
        .collect()
}

fn field_loads(assignments: &[GameAssignment]) -> Vec<FieldLoad> {
    let mut acc: BTreeMap<&str, (usize, BTreeSet<&str>)> = BTreeMap::new();
    for a in assignments {
        if let Some(field) = &a.field_id {
            let entry = acc.entry(field.as_str()).or_default();
            entry.0 += 1;
            entry.1.insert(a.division.as_str());
        }
    }
    acc.into_iter()
        .map(|(field, (games, divisions))| FieldLoad {
            field_id: field.to_string(),
            games,
            divisions: divisions.into_iter().map(str::to_string).collect(),
        })
        .collect()
}

fn team_loads(assignments: &[GameAssignment], teams: &[Team]) -> Vec<TeamLoad> {
    let mut loads: BTreeMap<String, TeamLoad> = teams
        .iter()
        .map(|t| {
            (
                t.id.clone(),
                TeamLoad {
                    team_id: t.id.clone(),
                    division: Some(t.division.clone()),
                    games: 0,
                    home_games: 0,
                    away_games: 0,
                    unique_fields: 0,
                    weeks_played: Vec::new(),
                    earliest_start: None,
                    latest_start: None,
                },
            )
        })
        .collect();
    let mut fields: HashMap<String, BTreeSet<&str>> = HashMap::new();

    for a in assignments {
        for (team_id, is_home) in [(&a.home_team_id, true), (&a.away_team_id, false)] {
            let load = loads.entry(team_id.clone()).or_insert_with(|| TeamLoad {
                team_id: team_id.clone(),
                division: None,
                games: 0,
                home_games: 0,
                away_games: 0,
                unique_fields: 0,
                weeks_played: Vec::new(),
                earliest_start: None,
                latest_start: None,
            });
            load.games += 1;
            if is_home {
                load.home_games += 1;
            } else {
                load.away_games += 1;
            }
            if !load.weeks_played.contains(&a.week_index) {
                load.weeks_played.push(a.week_index);
            }
            load.earliest_start = Some(load.earliest_start.map_or(a.start, |s| s.min(a.start)));
            load.latest_start = Some(load.latest_start.map_or(a.start, |s| s.max(a.start)));
            if let Some(field) = &a.field_id {
                fields.entry(team_id.clone()).or_default().insert(field.as_str());
            }
        }
    }

    loads
        .into_values()
        .map(|mut load| {
            load.weeks_played.sort_unstable();
            load.unique_fields = fields.get(&load.team_id).map_or(0, BTreeSet::len);
            load
        })
        .collect()
}

type Groups<'a> = BTreeMap<String, Vec<&'a GameAssignment>>;

fn group_by_team(assignments: &[GameAssignment]) -> Groups<'_> {
    let mut groups: Groups = BTreeMap::new();
    for a in assignments {
        for team in a.team_ids() {
            groups.entry(team.to_string()).or_default().push(a);
        }
    }
    groups
}

fn group_by_coach<'a>(
    assignments: &'a [GameAssignment],
    directory: &HashMap<&str, &Team>,
) -> Groups<'a> {
    let mut groups: Groups = BTreeMap::new();
    for a in assignments {
        let mut coaches: Vec<&str> = a
            .team_ids()
            .iter()
            .filter_map(|id| directory.get(id).and_then(|t| t.coach_id.as_deref()))
            .collect();
        coaches.dedup();
        for coach in coaches {
            groups.entry(coach.to_string()).or_default().push(a);
        }
    }
    groups
}

fn group_by_field(assignments: &[GameAssignment]) -> Groups<'_> {
    let mut groups: Groups = BTreeMap::new();
    for a in assignments {
        if let Some(field) = &a.field_id {
            groups.entry(field.clone()).or_default().push(a);
        }
    }
    groups
}

/// Sort each group by start and report the first adjacent overlapping pair, one warning per id.
fn overlap_warnings(kind: WarningKind, label: &str, groups: Groups<'_>) -> Vec<Warning> {
    let mut warnings = Vec::new();
    for (id, mut games) in groups {
        games.sort_by(|a, b| (a.start, a.end, a.key()).cmp(&(b.start, b.end, b.key())));
        let overlap = games.windows(2).find(|pair| pair[1].start < pair[0].end);
        if let Some(pair) = overlap {
            let (prev, curr) = (pair[0], pair[1]);
            warnings.push(Warning {
                kind,
                message: format!(
                    "{} {} has overlapping games: {} and {}",
                    label,
                    id,
                    prev.key(),
                    curr.key()
                ),
                details: json!({
                    "id": id,
                    "assignments": [prev.key(), curr.key()],
                    "previousEnd": prev.end,
                    "currentStart": curr.start,
                }),
            });
        }
    }
    warnings
}

/// Re-aggregate shared usage per field; flag fields whose division counts differ by more than one.
fn shared_imbalance_warnings(usage: &[SharedSlotUsage]) -> Vec<Warning> {
    let mut by_field: BTreeMap<&str, BTreeMap<&str, u32>> = BTreeMap::new();
    for record in usage {
        let field = record.field_id.as_deref().unwrap_or(record.slot_id.as_str());
        let counts = by_field.entry(field).or_default();
        for u in &record.division_usage {
            *counts.entry(u.division.as_str()).or_insert(0) += u.count;
        }
    }

    by_field
        .into_iter()
        .filter(|(_, counts)| counts.len() >= 2)
        .filter_map(|(field, counts)| {
            let max = counts.values().copied().max()?;
            let min = counts.values().copied().min()?;
            if max - min <= 1 {
                return None;
            }
            Some(Warning {
                kind: WarningKind::SharedSlotImbalance,
                message: format!(
                    "Shared field {} is unevenly split between divisions (spread {})",
                    field,
                    max - min
                ),
                details: json!({
                    "fieldId": field,
                    "spread": max - min,
                    "divisionUsage": counts,
                }),
            })
        })
        .collect()
}

fn unscheduled_warning(total: usize, by_reason: &BTreeMap<String, usize>) -> Option<Warning> {
    if total == 0 {
        return None;
    }
    let breakdown: Vec<String> = by_reason
        .iter()
        .map(|(reason, count)| format!("{}: {}", reason, count))
        .collect();
    Some(Warning {
        kind: WarningKind::UnscheduledMatchups,
        message: format!("{} matchups unscheduled: {}", total, breakdown.join(", ")),
        details: json!({
            "total": total,
            "byReason": by_reason,
        }),
    })
}
