//! Schedule configuration aggregate and its sub-entities.
//!
//! A [`ScheduleConfiguration`] is the unit of load/save per tenant. Operating
//! hours, breaks, and the booking policy are replaced wholesale; temporary
//! blocks support individual create/update/delete against the aggregate.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::time::{TimeOfDay, Weekday};
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Operating hours
// ---------------------------------------------------------------------------

/// Opening window for one weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingHours {
    pub weekday: Weekday,
    pub opens_at: TimeOfDay,
    pub closes_at: TimeOfDay,
    pub is_active: bool,
}

// ---------------------------------------------------------------------------
// Work breaks
// ---------------------------------------------------------------------------

/// A recurring intra-day interval (e.g. lunch) on a set of weekdays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkBreak {
    pub id: DbId,
    pub name: String,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub weekdays: BTreeSet<Weekday>,
    pub is_active: bool,
}

/// Payload entry for replacing the break list. Entries without an `id` are
/// assigned one by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkBreakInput {
    #[serde(default)]
    pub id: Option<DbId>,
    pub name: String,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    #[serde(default)]
    pub weekdays: BTreeSet<Weekday>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl WorkBreak {
    /// Whether this break applies on `weekday` and overlaps `[start, end)`.
    pub fn overlaps(&self, weekday: Weekday, start: TimeOfDay, end: TimeOfDay) -> bool {
        self.is_active
            && self.weekdays.contains(&weekday)
            && intervals_overlap(start, end, self.start_time, self.end_time)
    }
}

/// Turn break inputs into stored breaks, keeping supplied ids and numbering
/// new entries after the largest id already in use.
///
/// Fails when a new id would not fit in a [`DbId`].
pub fn assign_break_ids(inputs: Vec<WorkBreakInput>) -> Result<Vec<WorkBreak>, CoreError> {
    let mut last_id = inputs.iter().filter_map(|b| b.id).max().unwrap_or(0);
    inputs
        .into_iter()
        .map(|input| {
            let id = match input.id {
                Some(id) => id,
                None => {
                    last_id = last_id.checked_add(1).ok_or_else(|| {
                        CoreError::Validation(format!(
                            "break '{}' cannot be numbered after id {last_id}",
                            input.name
                        ))
                    })?;
                    last_id
                }
            };
            Ok(WorkBreak {
                id,
                name: input.name,
                start_time: input.start_time,
                end_time: input.end_time,
                weekdays: input.weekdays,
                is_active: input.is_active,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Temporary blocks
// ---------------------------------------------------------------------------

/// Why a temporary block exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockCategory {
    Vacation,
    Holiday,
    Maintenance,
    Event,
    Other,
}

impl BlockCategory {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockCategory::Vacation => "vacation",
            BlockCategory::Holiday => "holiday",
            BlockCategory::Maintenance => "maintenance",
            BlockCategory::Event => "event",
            BlockCategory::Other => "other",
        }
    }

    /// Parse from the database string representation.
    pub fn from_str_value(s: &str) -> Option<Self> {
        match s {
            "vacation" => Some(BlockCategory::Vacation),
            "holiday" => Some(BlockCategory::Holiday),
            "maintenance" => Some(BlockCategory::Maintenance),
            "event" => Some(BlockCategory::Event),
            "other" => Some(BlockCategory::Other),
            _ => None,
        }
    }
}

/// A date-range closure, shop-wide or restricted to specific staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporaryBlock {
    pub id: DbId,
    pub tenant_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// `None` together with `end_time` means the block covers whole days.
    pub start_time: Option<TimeOfDay>,
    pub end_time: Option<TimeOfDay>,
    /// Empty means the block applies to the whole shop.
    pub staff_ids: BTreeSet<DbId>,
    pub category: BlockCategory,
    pub is_active: bool,
    pub created_at: Timestamp,
}

impl TemporaryBlock {
    pub fn covers_date(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    pub fn is_shop_wide(&self) -> bool {
        self.staff_ids.is_empty()
    }

    /// Shop-wide blocks apply to everyone; staff blocks only to listed staff.
    pub fn applies_to(&self, staff_id: Option<DbId>) -> bool {
        self.is_shop_wide() || staff_id.is_some_and(|id| self.staff_ids.contains(&id))
    }

    /// Whether the block removes `[start, end)` on `date`.
    pub fn blocks_interval(&self, date: NaiveDate, start: TimeOfDay, end: TimeOfDay) -> bool {
        if !self.covers_date(date) {
            return false;
        }
        match (self.start_time, self.end_time) {
            (Some(block_start), Some(block_end)) => {
                intervals_overlap(start, end, block_start, block_end)
            }
            _ => true,
        }
    }

    /// The fields a client can set, as a create payload.
    pub fn to_input(&self) -> BlockInput {
        BlockInput {
            title: self.title.clone(),
            description: self.description.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            start_time: self.start_time,
            end_time: self.end_time,
            staff_ids: self.staff_ids.clone(),
            category: self.category,
        }
    }
}

/// Create payload for a temporary block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct BlockInput {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(max = 1000, message = "description must be at most 1000 characters"))]
    #[serde(default)]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub start_time: Option<TimeOfDay>,
    #[serde(default)]
    pub end_time: Option<TimeOfDay>,
    #[serde(default)]
    pub staff_ids: BTreeSet<DbId>,
    pub category: BlockCategory,
}

/// Partial update for a temporary block.
///
/// Nullable fields use `Option<Option<T>>`: absent leaves the field alone,
/// explicit `null` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BlockPatch {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub start_time: Option<Option<TimeOfDay>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub end_time: Option<Option<TimeOfDay>>,
    pub staff_ids: Option<BTreeSet<DbId>>,
    pub category: Option<BlockCategory>,
    pub is_active: Option<bool>,
}

impl BlockPatch {
    /// Merge the patch over `block`, returning the merged input and active
    /// flag. The result still has to be validated.
    pub fn merge(&self, block: &TemporaryBlock) -> (BlockInput, bool) {
        let mut input = block.to_input();
        if let Some(title) = &self.title {
            input.title = title.clone();
        }
        if let Some(description) = &self.description {
            input.description = description.clone();
        }
        if let Some(start_date) = self.start_date {
            input.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            input.end_date = end_date;
        }
        if let Some(start_time) = self.start_time {
            input.start_time = start_time;
        }
        if let Some(end_time) = self.end_time {
            input.end_time = end_time;
        }
        if let Some(staff_ids) = &self.staff_ids {
            input.staff_ids = staff_ids.clone();
        }
        if let Some(category) = self.category {
            input.category = category;
        }
        (input, self.is_active.unwrap_or(block.is_active))
    }
}

fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

// ---------------------------------------------------------------------------
// Booking policy
// ---------------------------------------------------------------------------

/// Scalar booking rules for a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct BookingPolicy {
    #[validate(range(min = 0, message = "must be zero or more hours"))]
    pub min_lead_hours: i32,
    #[validate(range(min = 1, message = "must be at least one day"))]
    pub max_lead_days: i32,
    #[validate(range(min = 1, max = 1440, message = "must be between 1 and 1440 minutes"))]
    pub slot_granularity_minutes: i32,
    pub allow_saturday: bool,
    pub allow_sunday: bool,
    pub allow_holiday: bool,
    #[validate(range(min = 0, message = "must be zero or more hours"))]
    pub cancel_lead_hours: i32,
    #[validate(range(min = 0, message = "must be zero or more hours"))]
    pub reschedule_lead_hours: i32,
}

// ---------------------------------------------------------------------------
// Aggregate
// ---------------------------------------------------------------------------

/// Per-tenant scheduling configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfiguration {
    pub id: DbId,
    pub tenant_id: DbId,
    pub operating_hours: Vec<OperatingHours>,
    pub work_breaks: Vec<WorkBreak>,
    pub blocks: Vec<TemporaryBlock>,
    pub booking_policy: BookingPolicy,
    /// Incremented on every mutation; used for optimistic concurrency.
    pub version: i64,
    pub updated_at: Timestamp,
}

impl ScheduleConfiguration {
    pub fn hours_for(&self, weekday: Weekday) -> Option<&OperatingHours> {
        self.operating_hours.iter().find(|h| h.weekday == weekday)
    }

    pub fn block(&self, block_id: DbId) -> Option<&TemporaryBlock> {
        self.blocks.iter().find(|b| b.id == block_id)
    }

    /// Fail with a conflict when the caller edited an older version.
    pub fn check_version(&self, expected: Option<i64>) -> Result<(), CoreError> {
        ensure_version(self.version, expected)
    }

    /// Record a mutation.
    pub fn touch(&mut self, now: Timestamp) {
        self.version += 1;
        self.updated_at = now;
    }
}

/// Compare a stored aggregate version against the caller's expectation.
/// `None` skips the check (last write wins).
pub fn ensure_version(current: i64, expected: Option<i64>) -> Result<(), CoreError> {
    match expected {
        Some(expected) if expected != current => Err(CoreError::Conflict(format!(
            "schedule configuration was modified (expected version {expected}, current {current})"
        ))),
        _ => Ok(()),
    }
}

/// A bookable staff member, as listed for block staff selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: DbId,
    pub name: String,
}

/// Half-open interval overlap: `[a_start, a_end)` vs `[b_start, b_end)`.
pub fn intervals_overlap(
    a_start: TimeOfDay,
    a_end: TimeOfDay,
    b_start: TimeOfDay,
    b_end: TimeOfDay,
) -> bool {
    !(a_end <= b_start || a_start >= b_end)
}

fn default_true() -> bool {
    true
}
