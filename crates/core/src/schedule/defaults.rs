//! Configuration seeded the first time a tenant's schedule is read.

use std::collections::BTreeSet;

use crate::schedule::model::{BookingPolicy, OperatingHours, ScheduleConfiguration, WorkBreak};
use crate::time::{TimeOfDay, Weekday};
use crate::types::{DbId, Timestamp};

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            min_lead_hours: 2,
            max_lead_days: 30,
            slot_granularity_minutes: 30,
            allow_saturday: true,
            allow_sunday: false,
            allow_holiday: false,
            cancel_lead_hours: 24,
            reschedule_lead_hours: 12,
        }
    }
}

fn hm(hour: u8, minute: u8) -> TimeOfDay {
    // Constant inputs, always in range.
    TimeOfDay::new(hour, minute).unwrap_or(TimeOfDay::MIDNIGHT)
}

/// Mon-Fri 08:00-18:00, Sat 08:00-14:00, Sun closed.
pub fn default_operating_hours() -> Vec<OperatingHours> {
    Weekday::ALL
        .iter()
        .map(|&weekday| match weekday {
            Weekday::Sunday => OperatingHours {
                weekday,
                opens_at: hm(8, 0),
                closes_at: hm(12, 0),
                is_active: false,
            },
            Weekday::Saturday => OperatingHours {
                weekday,
                opens_at: hm(8, 0),
                closes_at: hm(14, 0),
                is_active: true,
            },
            _ => OperatingHours {
                weekday,
                opens_at: hm(8, 0),
                closes_at: hm(18, 0),
                is_active: true,
            },
        })
        .collect()
}

/// A single weekday lunch break, 12:00-13:00.
pub fn default_work_breaks() -> Vec<WorkBreak> {
    vec![WorkBreak {
        id: 1,
        name: "Almoço".to_string(),
        start_time: hm(12, 0),
        end_time: hm(13, 0),
        weekdays: BTreeSet::from([
            Weekday::Monday,
            Weekday::Tuesday,
            Weekday::Wednesday,
            Weekday::Thursday,
            Weekday::Friday,
        ]),
        is_active: true,
    }]
}

impl ScheduleConfiguration {
    /// A fresh configuration with default hours, breaks, and policy.
    pub fn seeded(id: DbId, tenant_id: DbId, now: Timestamp) -> Self {
        Self {
            id,
            tenant_id,
            operating_hours: default_operating_hours(),
            work_breaks: default_work_breaks(),
            blocks: Vec::new(),
            booking_policy: BookingPolicy::default(),
            version: 1,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::validation::{
        validate_booking_policy, validate_operating_hours, validate_work_breaks,
    };

    #[test]
    fn seeded_configuration_passes_validation() {
        let config = ScheduleConfiguration::seeded(1, 1, chrono::Utc::now());
        assert!(validate_operating_hours(&config.operating_hours).is_ok());
        assert!(validate_work_breaks(&config.work_breaks).is_ok());
        assert!(validate_booking_policy(&config.booking_policy).is_ok());
        assert_eq!(config.operating_hours.len(), 7);
    }

    #[test]
    fn sunday_is_closed_by_default() {
        let config = ScheduleConfiguration::seeded(1, 1, chrono::Utc::now());
        assert!(!config.hours_for(Weekday::Sunday).unwrap().is_active);
        assert!(config.hours_for(Weekday::Saturday).unwrap().is_active);
    }
}
