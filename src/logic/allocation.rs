//! Slot allocation: bind each round robin fixture to a concrete field/time slot.
//!
//! Fixtures are processed week by week, division by division. Division-specific
//! slots are tried first, then shared slots. A slot is usable while it has capacity
//! and neither team nor either team's coach is already booked for an overlapping
//! interval.
//! Candidates are ranked by an ordered list of criteria; the first criterion that
//! tells two slots apart decides.

use crate::logic::validation::{validate_slots, validate_teams};
use crate::models::{
    intervals_overlap, Bye, DivisionUsage, GameAssignment, GameScheduleResult, Matchup,
    RoundRobinWeek, SchedulerError, SharedSlotUsage, Slot, Team, UnscheduledEntry,
    UnscheduledReason,
};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// A usable slot together with the metrics it is ranked by.
#[derive(Clone, Debug)]
pub struct SlotCandidate<'a> {
    pub slot: &'a Slot,
    /// Number of the two teams whose usual kickoff time matches this slot.
    pub consistency: u32,
    /// Games this division already has on this (shared) slot.
    pub slot_usage: u32,
    /// Games this division already has on this slot's field across shared slots.
    pub field_usage: u32,
}

/// One ranking criterion. `Less` means `a` is preferred.
pub type Criterion = fn(&SlotCandidate, &SlotCandidate) -> Ordering;

pub fn by_priority(a: &SlotCandidate, b: &SlotCandidate) -> Ordering {
    b.slot.priority.cmp(&a.slot.priority)
}

pub fn by_slot_usage(a: &SlotCandidate, b: &SlotCandidate) -> Ordering {
    a.slot_usage.cmp(&b.slot_usage)
}

pub fn by_field_usage(a: &SlotCandidate, b: &SlotCandidate) -> Ordering {
    a.field_usage.cmp(&b.field_usage)
}

pub fn by_consistency(a: &SlotCandidate, b: &SlotCandidate) -> Ordering {
    b.consistency.cmp(&a.consistency)
}

pub fn by_start(a: &SlotCandidate, b: &SlotCandidate) -> Ordering {
    a.slot.start.cmp(&b.slot.start)
}

pub fn by_field(a: &SlotCandidate, b: &SlotCandidate) -> Ordering {
    a.slot.field_id.cmp(&b.slot.field_id)
}

pub fn by_slot_id(a: &SlotCandidate, b: &SlotCandidate) -> Ordering {
    a.slot.id.cmp(&b.slot.id)
}

/// Ranking for slots reserved to the fixture's division.
pub const DIVISION_SLOT_ORDER: &[Criterion] =
    &[by_priority, by_consistency, by_start, by_field, by_slot_id];

/// Ranking for shared slots: spread divisions evenly before chasing consistency.
pub const SHARED_SLOT_ORDER: &[Criterion] = &[
    by_priority,
    by_slot_usage,
    by_field_usage,
    by_consistency,
    by_start,
    by_field,
    by_slot_id,
];

/// Compare with each criterion in turn, stopping at the first non-equal result.
pub fn compare_candidates(
    criteria: &[Criterion],
    a: &SlotCandidate,
    b: &SlotCandidate,
) -> Ordering {
    criteria
        .iter()
        .map(|criterion| criterion(a, b))
        .find(|o| *o != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

/// Place every fixture into a slot. Fixtures that cannot be placed are reported as
/// unscheduled; only malformed teams or slots are errors.
pub fn schedule_games(
    teams: &[Team],
    slots: &[Slot],
    fixtures: &BTreeMap<String, Vec<RoundRobinWeek>>,
) -> Result<GameScheduleResult, SchedulerError> {
    validate_teams(teams)?;
    validate_slots(slots)?;

    let mut allocator = Allocator::new(teams, slots);
    let mut byes = Vec::new();
    let mut unscheduled = Vec::new();
    let mut assignments = Vec::new();

    let week_indexes: BTreeSet<u32> = fixtures
        .values()
        .flat_map(|weeks| weeks.iter().map(|w| w.week_index))
        .collect();

    for week_index in week_indexes {
        for (division, weeks) in fixtures {
            for week in weeks.iter().filter(|w| w.week_index == week_index) {
                for team_id in &week.byes {
                    byes.push(Bye {
                        week_index,
                        division: division.clone(),
                        team_id: team_id.clone(),
                    });
                }
                for matchup in &week.matchups {
                    match allocator.place(week_index, division, matchup) {
                        Ok(assignment) => assignments.push(assignment),
                        Err(reason) => {
                            log::debug!(
                                "Week {} {}: {} vs {} unscheduled ({})",
                                week_index,
                                division,
                                matchup.home_team_id,
                                matchup.away_team_id,
                                reason
                            );
                            unscheduled.push(UnscheduledEntry {
                                week_index,
                                division: division.clone(),
                                matchup: matchup.clone(),
                                reason,
                            });
                        }
                    }
                }
            }
        }
    }

    assignments.sort_by(|a, b| {
        (a.week_index, &a.division, a.start, &a.slot_id, &a.home_team_id).cmp(&(
            b.week_index,
            &b.division,
            b.start,
            &b.slot_id,
            &b.home_team_id,
        ))
    });
    byes.sort_by(|a, b| {
        (a.week_index, &a.division, &a.team_id).cmp(&(b.week_index, &b.division, &b.team_id))
    });
    unscheduled.sort_by(|a, b| {
        (a.week_index, &a.division, &a.matchup).cmp(&(b.week_index, &b.division, &b.matchup))
    });

    if !unscheduled.is_empty() {
        log::warn!("{} fixture(s) could not be scheduled", unscheduled.len());
    }
    log::info!(
        "Scheduled {} games ({} byes, {} unscheduled) over {} slots",
        assignments.len(),
        byes.len(),
        unscheduled.len(),
        slots.len()
    );

    Ok(GameScheduleResult {
        shared_slot_usage: allocator.shared_usage_summary(),
        remaining_capacity: allocator
            .remaining
            .iter()
            .map(|(id, cap)| (id.to_string(), *cap))
            .collect(),
        assignments,
        byes,
        unscheduled,
    })
}

/// Running kickoff-time tally for one team.
#[derive(Debug, Default)]
struct TimePreference {
    counts: HashMap<u32, u32>,
    preferred: Option<u32>,
}

impl TimePreference {
    /// Majority vote; a tie goes to the minute just recorded.
    fn record(&mut self, minute: u32) {
        let count = {
            let c = self.counts.entry(minute).or_insert(0);
            *c += 1;
            *c
        };
        let best = self
            .preferred
            .and_then(|p| self.counts.get(&p).copied())
            .unwrap_or(0);
        if count >= best {
            self.preferred = Some(minute);
        }
    }
}

/// Why candidates were turned down while looking for a slot.
#[derive(Debug, Default)]
struct Rejections {
    full: usize,
    coach_overlap: usize,
    team_overlap: usize,
}

type Interval = (DateTime<Utc>, DateTime<Utc>);

/// Per-run bookkeeping. Lives for one `schedule_games` call.
struct Allocator<'a> {
    teams: HashMap<&'a str, &'a Team>,
    slots: &'a [Slot],
    remaining: BTreeMap<&'a str, u32>,
    coach_busy: HashMap<String, Vec<Interval>>,
    team_busy: HashMap<String, Vec<Interval>>,
    team_weeks: HashSet<(String, u32)>,
    seen_pairs: HashSet<(String, Matchup)>,
    slot_usage: HashMap<&'a str, BTreeMap<String, u32>>,
    field_usage: HashMap<String, BTreeMap<String, u32>>,
    preferences: HashMap<String, TimePreference>,
}

impl<'a> Allocator<'a> {
    fn new(teams: &'a [Team], slots: &'a [Slot]) -> Self {
        Self {
            teams: teams.iter().map(|t| (t.id.as_str(), t)).collect(),
            slots,
            remaining: slots.iter().map(|s| (s.id.as_str(), s.capacity)).collect(),
            coach_busy: HashMap::new(),
            team_busy: HashMap::new(),
            team_weeks: HashSet::new(),
            seen_pairs: HashSet::new(),
            slot_usage: HashMap::new(),
            field_usage: HashMap::new(),
            preferences: HashMap::new(),
        }
    }

    fn place(
        &mut self,
        week: u32,
        division: &str,
        matchup: &Matchup,
    ) -> Result<GameAssignment, UnscheduledReason> {
        let (home, away) = match (
            self.teams.get(matchup.home_team_id.as_str()),
            self.teams.get(matchup.away_team_id.as_str()),
        ) {
            (Some(home), Some(away)) => (*home, *away),
            _ => return Err(UnscheduledReason::UnknownTeam),
        };
        if home.division != division || away.division != division {
            return Err(UnscheduledReason::DivisionMismatch);
        }
        let canonical = Matchup::canonical(&home.id, &away.id);
        if home.id == away.id
            || self.team_weeks.contains(&(home.id.clone(), week))
            || self.team_weeks.contains(&(away.id.clone(), week))
            || !self.seen_pairs.insert((division.to_string(), canonical))
        {
            return Err(UnscheduledReason::DuplicateMatchup);
        }
        if home.coach_id.is_some() && home.coach_id == away.coach_id {
            return Err(UnscheduledReason::CoachCoachesBothTeams);
        }

        let mut coaches: Vec<&str> = Vec::new();
        for c in [&home.coach_id, &away.coach_id].into_iter().flatten() {
            if !coaches.contains(&c.as_str()) {
                coaches.push(c.as_str());
            }
        }

        let mut rejections = Rejections::default();
        let slots = self.slots;
        let division_slots = slots
            .iter()
            .filter(|s| s.week_index == week && s.division.as_deref() == Some(division));
        let chosen = match self.best_slot(
            division_slots,
            DIVISION_SLOT_ORDER,
            division,
            home,
            away,
            &coaches,
            &mut rejections,
        ) {
            Some(slot) => Some(slot),
            None => {
                let shared_slots = slots
                    .iter()
                    .filter(|s| s.week_index == week && s.is_shared());
                self.best_slot(
                    shared_slots,
                    SHARED_SLOT_ORDER,
                    division,
                    home,
                    away,
                    &coaches,
                    &mut rejections,
                )
            }
        };

        let Some(slot) = chosen else {
            // A busy team or a full slot rules out a pure coach conflict.
            let coach_only = rejections.coach_overlap > 0
                && rejections.full == 0
                && rejections.team_overlap == 0;
            return Err(if coach_only {
                UnscheduledReason::CoachSchedulingConflict
            } else {
                UnscheduledReason::NoSlotAvailable
            });
        };

        self.book(slot, week, division, home, away, &coaches);
        Ok(GameAssignment {
            week_index: week,
            division: division.to_string(),
            slot_id: slot.id.clone(),
            start: slot.start,
            end: slot.end,
            home_team_id: home.id.clone(),
            away_team_id: away.id.clone(),
            field_id: slot.field_id.clone(),
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn best_slot(
        &self,
        candidates: impl Iterator<Item = &'a Slot>,
        criteria: &[Criterion],
        division: &str,
        home: &Team,
        away: &Team,
        coaches: &[&str],
        rejections: &mut Rejections,
    ) -> Option<&'a Slot> {
        let mut best: Option<SlotCandidate<'a>> = None;
        for slot in candidates {
            if self.remaining.get(slot.id.as_str()).copied().unwrap_or(0) == 0 {
                rejections.full += 1;
                continue;
            }
            if self.team_overlaps(home, away, slot) {
                rejections.team_overlap += 1;
                continue;
            }
            if self.coach_overlaps(coaches, slot) {
                rejections.coach_overlap += 1;
                continue;
            }
            let candidate = SlotCandidate {
                slot,
                consistency: self.consistency(slot, home, away),
                slot_usage: self.usage_on_slot(slot, division),
                field_usage: self.usage_on_field(slot, division),
            };
            let better = match &best {
                None => true,
                Some(current) => {
                    compare_candidates(criteria, &candidate, current) == Ordering::Less
                }
            };
            if better {
                best = Some(candidate);
            }
        }
        best.map(|c| c.slot)
    }

    fn coach_overlaps(&self, coaches: &[&str], slot: &Slot) -> bool {
        coaches
            .iter()
            .any(|coach| busy_during(self.coach_busy.get(*coach), slot))
    }

    /// Slots of different weeks may still share wall-clock time.
    fn team_overlaps(&self, home: &Team, away: &Team, slot: &Slot) -> bool {
        [home, away]
            .iter()
            .any(|team| busy_during(self.team_busy.get(&team.id), slot))
    }

    fn consistency(&self, slot: &Slot, home: &Team, away: &Team) -> u32 {
        let minute = slot.start_minute_of_day();
        [home, away]
            .iter()
            .filter(|t| {
                self.preferences
                    .get(&t.id)
                    .and_then(|p| p.preferred)
                    == Some(minute)
            })
            .count() as u32
    }

    fn usage_on_slot(&self, slot: &Slot, division: &str) -> u32 {
        self.slot_usage
            .get(slot.id.as_str())
            .and_then(|u| u.get(division).copied())
            .unwrap_or(0)
    }

    fn usage_on_field(&self, slot: &Slot, division: &str) -> u32 {
        slot.field_id
            .as_ref()
            .and_then(|f| self.field_usage.get(f))
            .and_then(|u| u.get(division).copied())
            .unwrap_or(0)
    }

    fn book(
        &mut self,
        slot: &'a Slot,
        week: u32,
        division: &str,
        home: &Team,
        away: &Team,
        coaches: &[&str],
    ) {
        if let Some(cap) = self.remaining.get_mut(slot.id.as_str()) {
            *cap = cap.saturating_sub(1);
        }
        for coach in coaches {
            self.coach_busy
                .entry(coach.to_string())
                .or_default()
                .push((slot.start, slot.end));
        }
        let minute = slot.start_minute_of_day();
        for team in [home, away] {
            self.team_weeks.insert((team.id.clone(), week));
            self.team_busy
                .entry(team.id.clone())
                .or_default()
                .push((slot.start, slot.end));
            self.preferences.entry(team.id.clone()).or_default().record(minute);
        }
        if slot.is_shared() {
            *self
                .slot_usage
                .entry(slot.id.as_str())
                .or_default()
                .entry(division.to_string())
                .or_insert(0) += 1;
            if let Some(field) = &slot.field_id {
                *self
                    .field_usage
                    .entry(field.clone())
                    .or_default()
                    .entry(division.to_string())
                    .or_insert(0) += 1;
            }
        }
    }

    /// One record per shared slot that hosted at least one game, by week then slot id.
    fn shared_usage_summary(&self) -> Vec<SharedSlotUsage> {
        let mut summary: Vec<SharedSlotUsage> = self
            .slots
            .iter()
            .filter_map(|slot| {
                let usage = self.slot_usage.get(slot.id.as_str())?;
                let division_usage: Vec<DivisionUsage> = usage
                    .iter()
                    .map(|(division, count)| DivisionUsage {
                        division: division.clone(),
                        count: *count,
                    })
                    .collect();
                Some(SharedSlotUsage {
                    slot_id: slot.id.clone(),
                    field_id: slot.field_id.clone(),
                    week_index: slot.week_index,
                    total_assignments: division_usage.iter().map(|u| u.count).sum(),
                    division_usage,
                })
            })
            .collect();
        summary.sort_by(|a, b| (a.week_index, &a.slot_id).cmp(&(b.week_index, &b.slot_id)));
        summary
    }
}

fn busy_during(busy: Option<&Vec<Interval>>, slot: &Slot) -> bool {
    busy.is_some_and(|intervals| {
        intervals
            .iter()
            .any(|(start, end)| intervals_overlap(start, end, &slot.start, &slot.end))
    })
}
