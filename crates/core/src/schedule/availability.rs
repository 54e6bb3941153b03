//! Availability evaluator and the independent booking-rule checks.
//!
//! [`is_bookable`] answers the raw question "is this interval open and not
//! blocked?" using operating hours and temporary blocks only. Lead time,
//! weekend/holiday permission, and breaks are separate predicates so callers
//! can compose them; [`crate::schedule::booking`] does exactly that.
//!
//! Times are shop-local wall-clock values; `now` must be expressed in the
//! same local time as the candidate.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::schedule::model::{BlockCategory, BookingPolicy, ScheduleConfiguration, WorkBreak};
use crate::time::{TimeOfDay, Weekday};
use crate::types::DbId;

/// Whether `[start, end)` on `date` is bookable for `staff_id` (or for the
/// shop in general when `None`).
///
/// Short-circuits on the first failing rule:
/// 1. the weekday must have active operating hours;
/// 2. the interval must fit inside them;
/// 3. no active block that applies to the staff member may cover it.
pub fn is_bookable(
    config: &ScheduleConfiguration,
    date: NaiveDate,
    start: TimeOfDay,
    end: TimeOfDay,
    staff_id: Option<DbId>,
) -> bool {
    let weekday = Weekday::of(date);

    let Some(hours) = config.hours_for(weekday) else {
        return false;
    };
    if !hours.is_active {
        return false;
    }
    if start < hours.opens_at || end > hours.closes_at {
        return false;
    }

    !config
        .blocks
        .iter()
        .filter(|block| block.is_active && block.applies_to(staff_id))
        .any(|block| block.blocks_interval(date, start, end))
}

/// Whether `candidate` is at least `min_lead_hours` and at most
/// `max_lead_days` away from `now`.
pub fn is_within_lead_window(
    now: NaiveDateTime,
    candidate: NaiveDateTime,
    policy: &BookingPolicy,
) -> bool {
    let lead = candidate - now;
    lead >= Duration::hours(i64::from(policy.min_lead_hours))
        && lead <= Duration::days(i64::from(policy.max_lead_days))
}

/// Saturday/Sunday gating, independent of operating hours.
pub fn is_weekday_permitted(weekday: Weekday, policy: &BookingPolicy) -> bool {
    match weekday {
        Weekday::Saturday => policy.allow_saturday,
        Weekday::Sunday => policy.allow_sunday,
        _ => true,
    }
}

/// A date is a holiday when an active, shop-wide holiday block covers it.
pub fn is_holiday(config: &ScheduleConfiguration, date: NaiveDate) -> bool {
    config.blocks.iter().any(|block| {
        block.is_active
            && block.category == BlockCategory::Holiday
            && block.is_shop_wide()
            && block.covers_date(date)
    })
}

/// Whether `[start, end)` overlaps any active break scheduled on `weekday`.
pub fn is_within_break(
    start: TimeOfDay,
    end: TimeOfDay,
    weekday: Weekday,
    breaks: &[WorkBreak],
) -> bool {
    breaks.iter().any(|b| b.overlaps(weekday, start, end))
}

/// An appointment can be cancelled while at least `cancel_lead_hours`
/// remain before it starts.
pub fn can_cancel(now: NaiveDateTime, appointment_start: NaiveDateTime, policy: &BookingPolicy) -> bool {
    appointment_start - now >= Duration::hours(i64::from(policy.cancel_lead_hours))
}

/// An appointment can be moved while at least `reschedule_lead_hours`
/// remain before it starts.
pub fn can_reschedule(
    now: NaiveDateTime,
    appointment_start: NaiveDateTime,
    policy: &BookingPolicy,
) -> bool {
    appointment_start - now >= Duration::hours(i64::from(policy.reschedule_lead_hours))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::schedule::model::{OperatingHours, TemporaryBlock};

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    /// 2024-06-03 is a Monday.
    const MONDAY: &str = "2024-06-03";
    const SUNDAY: &str = "2024-06-02";

    fn config() -> ScheduleConfiguration {
        let mut config = ScheduleConfiguration::seeded(1, 1, chrono::Utc::now());
        config.operating_hours = Weekday::ALL
            .iter()
            .map(|&weekday| OperatingHours {
                weekday,
                opens_at: t("08:00"),
                closes_at: t("18:00"),
                is_active: weekday != Weekday::Sunday,
            })
            .collect();
        config
    }

    fn block(staff_ids: &[DbId], times: Option<(&str, &str)>) -> TemporaryBlock {
        TemporaryBlock {
            id: 10,
            tenant_id: 1,
            title: "Bloqueio".to_string(),
            description: None,
            start_date: d(MONDAY),
            end_date: d(MONDAY),
            start_time: times.map(|(s, _)| t(s)),
            end_time: times.map(|(_, e)| t(e)),
            staff_ids: staff_ids.iter().copied().collect(),
            category: BlockCategory::Other,
            is_active: true,
            created_at: chrono::Utc::now(),
        }
    }

    // -----------------------------------------------------------------------
    // Evaluator scenarios
    // -----------------------------------------------------------------------

    #[test]
    fn open_day_without_blocks_is_bookable() {
        assert!(is_bookable(&config(), d(MONDAY), t("09:00"), t("10:00"), None));
    }

    #[test]
    fn shop_wide_full_day_block_wins_regardless_of_staff() {
        let mut config = config();
        config.blocks.push(block(&[], None));
        for staff in [None, Some(1), Some(2)] {
            assert!(!is_bookable(&config, d(MONDAY), t("09:00"), t("10:00"), staff));
        }
    }

    #[test]
    fn block_ending_at_start_does_not_overlap() {
        let mut config = config();
        config.blocks.push(block(&[], Some(("07:00", "09:00"))));
        assert!(is_bookable(&config, d(MONDAY), t("09:00"), t("10:00"), None));
        assert!(!is_bookable(&config, d(MONDAY), t("08:30"), t("09:30"), None));
    }

    #[test]
    fn staff_block_does_not_affect_other_staff() {
        let mut config = config();
        config.blocks.push(block(&[1], None));
        assert!(is_bookable(&config, d(MONDAY), t("09:00"), t("10:00"), Some(2)));
        assert!(!is_bookable(&config, d(MONDAY), t("09:00"), t("10:00"), Some(1)));
    }

    #[test]
    fn inactive_weekday_is_never_bookable() {
        let config = config();
        assert!(!is_bookable(&config, d(SUNDAY), t("09:00"), t("10:00"), None));
        assert!(!is_bookable(&config, d(SUNDAY), t("09:00"), t("10:00"), Some(1)));
    }

    #[test]
    fn interval_must_fit_inside_opening_hours() {
        let config = config();
        assert!(is_bookable(&config, d(MONDAY), t("08:00"), t("18:00"), None));
        assert!(!is_bookable(&config, d(MONDAY), t("07:30"), t("08:30"), None));
        assert!(!is_bookable(&config, d(MONDAY), t("17:30"), t("18:30"), None));
    }

    #[test]
    fn inactive_block_is_ignored() {
        let mut config = config();
        let mut b = block(&[], None);
        b.is_active = false;
        config.blocks.push(b);
        assert!(is_bookable(&config, d(MONDAY), t("09:00"), t("10:00"), None));
    }

    #[test]
    fn missing_weekday_entry_is_not_bookable() {
        let mut config = config();
        config.operating_hours.retain(|h| h.weekday != Weekday::Monday);
        assert!(!is_bookable(&config, d(MONDAY), t("09:00"), t("10:00"), None));
    }

    #[test]
    fn evaluator_ignores_breaks() {
        // The default lunch break covers 12:00-13:00 on weekdays.
        let config = config();
        assert!(is_bookable(&config, d(MONDAY), t("12:00"), t("12:30"), None));
        assert!(is_within_break(
            t("12:00"),
            t("12:30"),
            Weekday::Monday,
            &config.work_breaks
        ));
    }

    // -----------------------------------------------------------------------
    // Composable checks
    // -----------------------------------------------------------------------

    #[test]
    fn lead_window_bounds_are_inclusive() {
        let policy = BookingPolicy::default(); // 2h .. 30d
        let now = dt("2024-06-03 08:00");
        assert!(!is_within_lead_window(now, dt("2024-06-03 09:59"), &policy));
        assert!(is_within_lead_window(now, dt("2024-06-03 10:00"), &policy));
        assert!(is_within_lead_window(now, dt("2024-07-03 08:00"), &policy));
        assert!(!is_within_lead_window(now, dt("2024-07-03 08:01"), &policy));
    }

    #[test]
    fn weekend_permission_follows_policy() {
        let mut policy = BookingPolicy::default();
        assert!(is_weekday_permitted(Weekday::Saturday, &policy));
        assert!(!is_weekday_permitted(Weekday::Sunday, &policy));
        assert!(is_weekday_permitted(Weekday::Wednesday, &policy));
        policy.allow_saturday = false;
        assert!(!is_weekday_permitted(Weekday::Saturday, &policy));
    }

    #[test]
    fn holiday_requires_shop_wide_holiday_block() {
        let mut config = config();
        let mut staff_holiday = block(&[3], None);
        staff_holiday.category = BlockCategory::Holiday;
        config.blocks.push(staff_holiday);
        assert!(!is_holiday(&config, d(MONDAY)));

        let mut holiday = block(&[], None);
        holiday.category = BlockCategory::Holiday;
        config.blocks.push(holiday);
        assert!(is_holiday(&config, d(MONDAY)));
        assert!(!is_holiday(&config, d("2024-06-04")));
    }

    #[test]
    fn break_applies_only_on_its_weekdays() {
        let breaks = vec![WorkBreak {
            id: 1,
            name: "Almoço".to_string(),
            start_time: t("12:00"),
            end_time: t("13:00"),
            weekdays: BTreeSet::from([Weekday::Monday]),
            is_active: true,
        }];
        assert!(is_within_break(t("11:30"), t("12:30"), Weekday::Monday, &breaks));
        assert!(!is_within_break(t("11:30"), t("12:30"), Weekday::Tuesday, &breaks));
        assert!(!is_within_break(t("13:00"), t("13:30"), Weekday::Monday, &breaks));
    }

    #[test]
    fn cancellation_and_reschedule_deadlines() {
        let policy = BookingPolicy::default(); // cancel 24h, reschedule 12h
        let now = dt("2024-06-03 08:00");
        let appointment = dt("2024-06-04 07:00");
        assert!(!can_cancel(now, appointment, &policy));
        assert!(can_reschedule(now, appointment, &policy));
        assert!(can_cancel(now, dt("2024-06-04 08:00"), &policy));
    }
}
