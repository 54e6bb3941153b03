//! Composed booking check and slot enumeration.
//!
//! Breaks hard-block booking here: a request overlapping an active break is
//! rejected with [`BookingRejection::DuringBreak`], and slots that overlap a
//! break are never offered. The raw evaluator stays break-agnostic.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::schedule::availability::{
    is_bookable, is_holiday, is_weekday_permitted, is_within_break, is_within_lead_window,
};
use crate::schedule::model::ScheduleConfiguration;
use crate::schedule::validation::validate_interval;
use crate::time::{TimeOfDay, Weekday};
use crate::types::DbId;

/// A prospective appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub date: NaiveDate,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    #[serde(default)]
    pub staff_id: Option<DbId>,
}

/// The first rule a booking request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingRejection {
    OutsideLeadWindow,
    WeekdayNotPermitted,
    HolidayNotPermitted,
    MisalignedSlot,
    Unavailable,
    DuringBreak,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingVerdict {
    pub bookable: bool,
    pub reason: Option<BookingRejection>,
}

impl BookingVerdict {
    fn accepted() -> Self {
        Self {
            bookable: true,
            reason: None,
        }
    }

    fn rejected(reason: BookingRejection) -> Self {
        Self {
            bookable: false,
            reason: Some(reason),
        }
    }
}

/// Run every booking rule in order: lead window, weekday and holiday
/// permission, slot alignment, raw availability, breaks.
pub fn evaluate_booking(
    config: &ScheduleConfiguration,
    request: &BookingRequest,
    now: NaiveDateTime,
) -> Result<BookingVerdict, CoreError> {
    validate_interval(request.start_time, request.end_time)?;

    let policy = &config.booking_policy;
    let weekday = Weekday::of(request.date);
    let candidate = request.date.and_time(request.start_time.to_naive_time());

    if !is_within_lead_window(now, candidate, policy) {
        return Ok(BookingVerdict::rejected(BookingRejection::OutsideLeadWindow));
    }
    if !is_weekday_permitted(weekday, policy) {
        return Ok(BookingVerdict::rejected(BookingRejection::WeekdayNotPermitted));
    }
    if !policy.allow_holiday && is_holiday(config, request.date) {
        return Ok(BookingVerdict::rejected(BookingRejection::HolidayNotPermitted));
    }
    if let Some(hours) = config.hours_for(weekday) {
        if !is_aligned(hours.opens_at, request.start_time, policy.slot_granularity_minutes) {
            return Ok(BookingVerdict::rejected(BookingRejection::MisalignedSlot));
        }
    }
    if !is_bookable(
        config,
        request.date,
        request.start_time,
        request.end_time,
        request.staff_id,
    ) {
        return Ok(BookingVerdict::rejected(BookingRejection::Unavailable));
    }
    if is_within_break(
        request.start_time,
        request.end_time,
        weekday,
        &config.work_breaks,
    ) {
        return Ok(BookingVerdict::rejected(BookingRejection::DuringBreak));
    }
    Ok(BookingVerdict::accepted())
}

/// Start times on `date` for an appointment of `duration_minutes`, stepping
/// from the opening time by the slot granularity. Lead time is not applied.
pub fn available_slots(
    config: &ScheduleConfiguration,
    date: NaiveDate,
    duration_minutes: u32,
    staff_id: Option<DbId>,
) -> Result<Vec<TimeOfDay>, CoreError> {
    if duration_minutes == 0 {
        return Err(CoreError::Validation(
            "duration must be at least one minute".into(),
        ));
    }

    let weekday = Weekday::of(date);
    let Some(hours) = config.hours_for(weekday).filter(|h| h.is_active) else {
        return Ok(Vec::new());
    };
    let step = u32::try_from(config.booking_policy.slot_granularity_minutes)
        .ok()
        .filter(|s| *s > 0)
        .ok_or_else(|| CoreError::Internal("slot granularity must be positive".into()))?;

    let mut slots = Vec::new();
    let mut start = hours.opens_at;
    while let Some(end) = start.checked_add_minutes(duration_minutes) {
        if end > hours.closes_at {
            break;
        }
        if is_bookable(config, date, start, end, staff_id)
            && !is_within_break(start, end, weekday, &config.work_breaks)
        {
            slots.push(start);
        }
        match start.checked_add_minutes(step) {
            Some(next) => start = next,
            None => break,
        }
    }
    Ok(slots)
}

fn is_aligned(opens_at: TimeOfDay, start: TimeOfDay, granularity: i32) -> bool {
    let Ok(granularity) = u32::try_from(granularity) else {
        return false;
    };
    if granularity == 0 {
        return false;
    }
    // Starts before opening are left to the availability check.
    start < opens_at || (start.minutes() - opens_at.minutes()) % granularity == 0
}
