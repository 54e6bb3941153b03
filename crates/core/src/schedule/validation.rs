//! Invariant checks for every editable schedule table.
//!
//! Each validator fails on the first violation with a message that names the
//! offending entry, so editing surfaces can point at the exact row.

use std::collections::BTreeSet;

use validator::Validate;

use crate::error::CoreError;
use crate::schedule::model::{BlockInput, BookingPolicy, OperatingHours, WorkBreakInput};
use crate::time::{TimeOfDay, Weekday};
use crate::types::DbId;

/// Validate a full operating-hours table: one entry per weekday, and every
/// active entry opens before it closes.
pub fn validate_operating_hours(hours: &[OperatingHours]) -> Result<(), CoreError> {
    if hours.len() != Weekday::ALL.len() {
        return Err(CoreError::Validation(format!(
            "operating hours must have exactly 7 entries (one per weekday), got {}",
            hours.len()
        )));
    }

    let mut seen = BTreeSet::new();
    for entry in hours {
        if !seen.insert(entry.weekday) {
            return Err(CoreError::Validation(format!(
                "{} appears more than once in operating hours",
                entry.weekday
            )));
        }
        if entry.is_active && entry.opens_at >= entry.closes_at {
            return Err(CoreError::Validation(format!(
                "opening time must be before closing time for {} ({} >= {})",
                entry.weekday, entry.opens_at, entry.closes_at
            )));
        }
    }
    Ok(())
}

/// Validate a break list. Inactive breaks are kept as drafts and only need
/// unique ids.
pub fn validate_work_breaks<B: BreakFields>(breaks: &[B]) -> Result<(), CoreError> {
    let mut ids = BTreeSet::new();
    for (index, entry) in breaks.iter().enumerate() {
        if let Some(id) = entry.break_id() {
            if id <= 0 {
                return Err(CoreError::Validation(format!(
                    "break id {id} must be positive"
                )));
            }
            if !ids.insert(id) {
                return Err(CoreError::Validation(format!(
                    "break id {id} appears more than once"
                )));
            }
        }
        if !entry.active() {
            continue;
        }

        let label = if entry.name().trim().is_empty() {
            format!("break #{}", index + 1)
        } else {
            format!("break '{}'", entry.name())
        };
        if entry.name().trim().is_empty() {
            return Err(CoreError::Validation(format!("{label} must have a name")));
        }
        if entry.weekdays().is_empty() {
            return Err(CoreError::Validation(format!(
                "{label} must apply to at least one weekday"
            )));
        }
        let (start, end) = entry.interval();
        if start >= end {
            return Err(CoreError::Validation(format!(
                "{label} must start before it ends ({start} >= {end})"
            )));
        }
    }
    Ok(())
}

/// Uniform access to the fields break validation reads, for both stored
/// breaks and replace payloads.
pub trait BreakFields {
    fn break_id(&self) -> Option<DbId>;
    fn name(&self) -> &str;
    fn interval(&self) -> (TimeOfDay, TimeOfDay);
    fn weekdays(&self) -> &BTreeSet<Weekday>;
    fn active(&self) -> bool;
}

impl BreakFields for WorkBreakInput {
    fn break_id(&self) -> Option<DbId> {
        self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn interval(&self) -> (TimeOfDay, TimeOfDay) {
        (self.start_time, self.end_time)
    }
    fn weekdays(&self) -> &BTreeSet<Weekday> {
        &self.weekdays
    }
    fn active(&self) -> bool {
        self.is_active
    }
}

impl BreakFields for crate::schedule::model::WorkBreak {
    fn break_id(&self) -> Option<DbId> {
        Some(self.id)
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn interval(&self) -> (TimeOfDay, TimeOfDay) {
        (self.start_time, self.end_time)
    }
    fn weekdays(&self) -> &BTreeSet<Weekday> {
        &self.weekdays
    }
    fn active(&self) -> bool {
        self.is_active
    }
}

/// Validate booking policy ranges and the lead-window consistency rule.
pub fn validate_booking_policy(policy: &BookingPolicy) -> Result<(), CoreError> {
    policy.validate()?;

    let max_lead_hours = i64::from(policy.max_lead_days) * 24;
    if i64::from(policy.min_lead_hours) >= max_lead_hours {
        return Err(CoreError::Validation(format!(
            "min_lead_hours ({}) must be less than max_lead_days in hours ({max_lead_hours})",
            policy.min_lead_hours
        )));
    }
    Ok(())
}

/// Validate a block payload (create, or a patch merged over an existing block).
pub fn validate_block_input(input: &BlockInput) -> Result<(), CoreError> {
    if input.title.trim().is_empty() {
        return Err(CoreError::Validation("block title must not be empty".into()));
    }
    input.validate()?;

    if input.start_date > input.end_date {
        return Err(CoreError::Validation(format!(
            "block start date {} must not be after end date {}",
            input.start_date, input.end_date
        )));
    }

    match (input.start_time, input.end_time) {
        (None, None) => Ok(()),
        (Some(start), Some(end)) if start < end => Ok(()),
        (Some(start), Some(end)) => Err(CoreError::Validation(format!(
            "block start time must be before end time ({start} >= {end})"
        ))),
        _ => Err(CoreError::Validation(
            "block start_time and end_time must be given together or not at all".into(),
        )),
    }
}

/// Validate a queried interval: start strictly before end.
pub fn validate_interval(start: TimeOfDay, end: TimeOfDay) -> Result<(), CoreError> {
    if start >= end {
        return Err(CoreError::Validation(format!(
            "start time must be before end time ({start} >= {end})"
        )));
    }
    Ok(())
}
