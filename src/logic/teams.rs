//! Team generation: split each division's players into balanced teams while
//! keeping mutual buddies together and coaches' players on their coach's team.
//!
//! 1. Validate players and configs; group players by division.
//! 2. Work out how many teams the division needs.
//! 3. Build assignment units (mutual buddy pairs, everyone else alone).
//! 4. Place coach-linked units first (head coach units, then assistant-only units).
//! 5. Place the rest, highest skill first, onto the emptiest / weakest team.
//! 6. Summarise coverage, roster fill, skill spread and overflow.

use crate::logic::rng::{pick_index, SeededRng};
use crate::logic::validation::{validate_division_config, validate_players};
use crate::models::{
    AssignmentUnit, CoachCoverage, DivisionConfig, DivisionId, DivisionSummary, OverflowEntry,
    OverflowMetadata, OverflowReason, Player, PlayerId, RosterBalance, SchedulerError,
    SkillBalance, Team, TeamFill, TeamGenerationResult, UnmatchedBuddyRequest, UnmatchedReason,
};
use rand::RngCore;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Skill averages closer than this count as equal.
const SKILL_EPSILON: f64 = 1e-9;

/// Generate teams with a caller-supplied random source (used only to break exact ties).
pub fn generate_teams<R: RngCore + ?Sized>(
    players: &[Player],
    configs: &BTreeMap<DivisionId, DivisionConfig>,
    rng: &mut R,
) -> Result<TeamGenerationResult, SchedulerError> {
    validate_players(players)?;

    let mut by_division: BTreeMap<&str, Vec<&Player>> = BTreeMap::new();
    for p in players {
        by_division.entry(p.division.as_str()).or_default().push(p);
    }

    let mut result = TeamGenerationResult::default();
    for (division, division_players) in by_division {
        let config = configs
            .get(division)
            .ok_or_else(|| SchedulerError::MissingDivisionConfig(division.to_string()))?;
        validate_division_config(division, config)?;

        let outcome = generate_division(division, &division_players, config, rng)?;
        log::debug!(
            "Division {}: {} teams, {} overflow, {} unmatched buddy requests",
            division,
            outcome.teams.len(),
            outcome.overflow.len(),
            outcome.unmatched.len()
        );
        result.divisions.push(summarize_division(
            division,
            division_players.len(),
            config,
            &outcome.teams,
            &outcome.overflow,
        ));
        result.teams.extend(outcome.teams);
        result.overflow.extend(outcome.overflow);
        result.unmatched_requests.extend(outcome.unmatched);
    }

    result.overflow_by_reason = count_overflow(&result.overflow);
    if !result.overflow.is_empty() {
        log::warn!("{} unit(s) could not be placed on any team", result.overflow.len());
    }
    log::info!(
        "Generated {} teams for {} players across {} divisions",
        result.teams.len(),
        players.len(),
        result.divisions.len()
    );
    Ok(result)
}

/// Generate teams; with a seed the output is reproducible, without one `thread_rng` is used.
pub fn generate_teams_seeded(
    players: &[Player],
    configs: &BTreeMap<DivisionId, DivisionConfig>,
    seed: Option<&str>,
) -> Result<TeamGenerationResult, SchedulerError> {
    match seed {
        Some(seed) => generate_teams(players, configs, &mut SeededRng::from_seed_str(seed)),
        None => generate_teams(players, configs, &mut rand::thread_rng()),
    }
}

struct DivisionOutcome {
    teams: Vec<Team>,
    overflow: Vec<OverflowEntry>,
    unmatched: Vec<UnmatchedBuddyRequest>,
}

fn generate_division<R: RngCore + ?Sized>(
    division: &str,
    players: &[&Player],
    config: &DivisionConfig,
    rng: &mut R,
) -> Result<DivisionOutcome, SchedulerError> {
    let coach_count = players
        .iter()
        .filter_map(|p| p.coach_id.as_deref())
        .collect::<HashSet<_>>()
        .len();
    let required = config.required_team_count(players.len(), coach_count);

    let (units, unmatched) = build_units(division, players);
    let (coach_units, general_units): (Vec<_>, Vec<_>) =
        units.into_iter().partition(AssignmentUnit::has_coach_link);

    let mut roster = Roster::new(division, config);
    let mut overflow = Vec::new();

    // Head coach units before assistant-only units so assistants can find their head coach's team.
    let (head_units, assistant_units): (Vec<_>, Vec<_>) = coach_units
        .into_iter()
        .partition(|u| !u.head_coach_ids().is_empty());
    for unit in head_units.iter().chain(assistant_units.iter()) {
        if let Some(entry) = roster.place_coach_unit(unit)? {
            overflow.push(entry);
        }
    }

    while roster.teams.len() < required {
        roster.create_team(None);
    }

    let mut general_units = general_units;
    general_units.sort_by(|a, b| b.skill_total().total_cmp(&a.skill_total()));
    for unit in &general_units {
        if let Some(entry) = roster.place_general_unit(unit, rng) {
            overflow.push(entry);
        }
    }

    Ok(DivisionOutcome {
        teams: roster.teams,
        overflow,
        unmatched,
    })
}

/// Pair players whose buddy requests point at each other; everyone else is a singleton.
///
/// Self references, missing targets and one-sided requests become diagnostics,
/// one per requester/target pair.
pub fn build_units(
    division: &str,
    players: &[&Player],
) -> (Vec<AssignmentUnit>, Vec<UnmatchedBuddyRequest>) {
    let index: HashMap<&str, &Player> = players.iter().map(|p| (p.id.as_str(), *p)).collect();
    let mut consumed: HashSet<&str> = HashSet::new();
    let mut reported: HashSet<(PlayerId, PlayerId)> = HashSet::new();
    let mut units = Vec::new();
    let mut unmatched = Vec::new();

    let mut report = |requester: &Player, target: &str, reason: UnmatchedReason| {
        if reported.insert((requester.id.clone(), target.to_string())) {
            unmatched.push(UnmatchedBuddyRequest {
                division: division.to_string(),
                requester_id: requester.id.clone(),
                target_id: target.to_string(),
                reason,
            });
        }
    };

    for player in players {
        if consumed.contains(player.id.as_str()) {
            continue;
        }
        let partner = match player.buddy_id.as_deref() {
            None => None,
            Some(target) if target == player.id => {
                report(*player, target, UnmatchedReason::SelfReference);
                None
            }
            Some(target) => match index.get(target) {
                None => {
                    report(*player, target, UnmatchedReason::MissingTarget);
                    None
                }
                Some(buddy)
                    if buddy.buddy_id.as_deref() == Some(player.id.as_str())
                        && !consumed.contains(target) =>
                {
                    Some(*buddy)
                }
                Some(_) => {
                    report(*player, target, UnmatchedReason::NotReciprocal);
                    None
                }
            },
        };

        consumed.insert(player.id.as_str());
        match partner {
            Some(buddy) => {
                consumed.insert(buddy.id.as_str());
                units.push(AssignmentUnit::pair((*player).clone(), buddy.clone()));
            }
            None => units.push(AssignmentUnit::single((*player).clone())),
        }
    }

    (units, unmatched)
}

/// Working set of teams for one division.
struct Roster<'a> {
    division: &'a str,
    config: &'a DivisionConfig,
    teams: Vec<Team>,
}

impl<'a> Roster<'a> {
    fn new(division: &'a str, config: &'a DivisionConfig) -> Self {
        Self {
            division,
            config,
            teams: Vec::new(),
        }
    }

    fn create_team(&mut self, coach_id: Option<&str>) -> usize {
        let index = self.teams.len();
        let mut team = Team::new(
            format!("{}-team-{}", self.division, index + 1),
            self.config.team_name(self.division, index),
            self.division,
        );
        team.coach_id = coach_id.map(str::to_string);
        self.teams.push(team);
        index
    }

    fn overflow(
        &self,
        unit: &AssignmentUnit,
        reason: OverflowReason,
        coach_id: Option<String>,
    ) -> OverflowEntry {
        OverflowEntry {
            players: unit.players.clone(),
            reason,
            metadata: OverflowMetadata {
                division: self.division.to_string(),
                unit_size: unit.len(),
                coach_id,
                teams_considered: self.teams.len(),
            },
        }
    }

    /// Attach a coach-linked unit to its coach's team. Returns overflow when it does not fit.
    fn place_coach_unit(
        &mut self,
        unit: &AssignmentUnit,
    ) -> Result<Option<OverflowEntry>, SchedulerError> {
        let head_coaches = unit.head_coach_ids();
        if head_coaches.len() > 1 {
            return Err(SchedulerError::ConflictingCoaches {
                player_ids: unit.player_ids(),
                coach_ids: head_coaches,
            });
        }
        let assistants = unit.assistant_coach_ids();

        let team_idx = match head_coaches.first() {
            Some(coach) => match self
                .teams
                .iter()
                .position(|t| t.coach_id.as_ref() == Some(coach))
            {
                Some(idx) => idx,
                None => self.create_team(Some(coach.as_str())),
            },
            // Provisional policy: join a team already holding one of the assistants,
            // else seed a new one.
            None => match self
                .teams
                .iter()
                .position(|t| t.assistant_coach_ids.iter().any(|a| assistants.contains(a)))
            {
                Some(idx) => idx,
                None => self.create_team(None),
            },
        };

        if !self.teams[team_idx].has_room_for(unit.len(), self.config.max_roster_size) {
            let coach = head_coaches.into_iter().next().or_else(|| assistants.into_iter().next());
            return Ok(Some(self.overflow(unit, OverflowReason::CoachCapacity, coach)));
        }
        let team = &mut self.teams[team_idx];
        team.add_players(&unit.players);
        for a in &assistants {
            team.add_assistant(a);
        }
        Ok(None)
    }

    /// Place onto the team with fewest players, then lowest resulting average skill,
    /// then a random pick among the remaining ties.
    fn place_general_unit<R: RngCore + ?Sized>(
        &mut self,
        unit: &AssignmentUnit,
        rng: &mut R,
    ) -> Option<OverflowEntry> {
        let max = self.config.max_roster_size;
        let unit_skill = unit.skill_total();
        let candidates: Vec<(usize, usize, f64)> = self
            .teams
            .iter()
            .enumerate()
            .filter(|(_, t)| t.has_room_for(unit.len(), max))
            .map(|(i, t)| {
                let size = t.players.len() + unit.len();
                (i, t.players.len(), (t.skill_total + unit_skill) / size as f64)
            })
            .collect();

        let Some(fewest) = candidates.iter().map(|c| c.1).min() else {
            let reason = if unit.len() > 1 {
                OverflowReason::BuddyRequest
            } else {
                OverflowReason::Capacity
            };
            return Some(self.overflow(unit, reason, None));
        };
        let smallest: Vec<&(usize, usize, f64)> =
            candidates.iter().filter(|c| c.1 == fewest).collect();
        let lowest_avg = smallest.iter().map(|c| c.2).fold(f64::INFINITY, f64::min);
        let best: Vec<usize> = smallest
            .iter()
            .filter(|c| (c.2 - lowest_avg).abs() <= SKILL_EPSILON)
            .map(|c| c.0)
            .collect();

        let chosen = if best.len() == 1 {
            best[0]
        } else {
            best[pick_index(rng, best.len())]
        };
        self.teams[chosen].add_players(&unit.players);
        None
    }
}

fn count_overflow(overflow: &[OverflowEntry]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for entry in overflow {
        *counts.entry(entry.reason.as_str().to_string()).or_insert(0) += 1;
    }
    counts
}

fn summarize_division(
    division: &str,
    player_count: usize,
    config: &DivisionConfig,
    teams: &[Team],
    overflow: &[OverflowEntry],
) -> DivisionSummary {
    let uncoached_team_ids: Vec<String> = teams
        .iter()
        .filter(|t| t.coach_id.is_none())
        .map(|t| t.id.clone())
        .collect();
    let coach_coverage = CoachCoverage {
        teams_with_coach: teams.len() - uncoached_team_ids.len(),
        teams_without_coach: uncoached_team_ids.len(),
        uncoached_team_ids,
    };

    let max = config.max_roster_size;
    let roster_balance = RosterBalance {
        max_roster_size: max,
        min_players: teams.iter().map(|t| t.players.len()).min().unwrap_or(0),
        max_players: teams.iter().map(|t| t.players.len()).max().unwrap_or(0),
        teams: teams
            .iter()
            .map(|t| TeamFill {
                team_id: t.id.clone(),
                players: t.players.len(),
                fill_rate: t.players.len() as f64 / max as f64,
            })
            .collect(),
    };

    let averages: Vec<f64> = teams
        .iter()
        .filter(|t| !t.players.is_empty())
        .map(Team::average_skill)
        .collect();
    let skill_balance = if averages.is_empty() {
        SkillBalance::default()
    } else {
        let min_average = averages.iter().copied().fold(f64::INFINITY, f64::min);
        let max_average = averages.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        SkillBalance {
            min_average,
            max_average,
            spread: max_average - min_average,
        }
    };

    DivisionSummary {
        division: division.to_string(),
        player_count,
        team_count: teams.len(),
        coach_coverage,
        roster_balance,
        skill_balance,
        overflow_by_reason: count_overflow(overflow),
    }
}
