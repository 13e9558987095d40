//! Bookable field/time windows.

use crate::models::player::DivisionId;
use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a slot.
pub type SlotId = String;

/// Identifier for a physical field.
pub type FieldId = String;

/// A field/time window that can host `capacity` games.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub id: SlotId,
    /// None means shared: any division may use it.
    #[serde(default)]
    pub division: Option<DivisionId>,
    /// Week this slot belongs to (1-based).
    pub week_index: u32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub capacity: u32,
    #[serde(default)]
    pub field_id: Option<FieldId>,
    /// Higher is preferred.
    #[serde(default)]
    pub priority: i32,
}

impl Slot {
    pub fn new(
        id: impl Into<SlotId>,
        week_index: u32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        capacity: u32,
    ) -> Self {
        Self {
            id: id.into(),
            division: None,
            week_index,
            start,
            end,
            capacity,
            field_id: None,
            priority: 0,
        }
    }

    pub fn for_division(mut self, division: impl Into<DivisionId>) -> Self {
        self.division = Some(division.into());
        self
    }

    pub fn on_field(mut self, field_id: impl Into<FieldId>) -> Self {
        self.field_id = Some(field_id.into());
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn is_shared(&self) -> bool {
        self.division.is_none()
    }

    /// Kickoff minute of day (UTC).
    pub fn start_minute_of_day(&self) -> u32 {
        minute_of_day(&self.start)
    }
}

pub fn minute_of_day(at: &DateTime<Utc>) -> u32 {
    at.hour() * 60 + at.minute()
}

/// Half-open interval overlap: `[a_start, a_end)` and `[b_start, b_end)`.
pub fn intervals_overlap(
    a_start: &DateTime<Utc>,
    a_end: &DateTime<Utc>,
    b_start: &DateTime<Utc>,
    b_end: &DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}
