//! Query parameter types for the availability endpoints.

use chrono::NaiveDate;
use serde::Deserialize;

use barbershop_core::time::TimeOfDay;
use barbershop_core::types::DbId;

/// `?date=&start=&end=&staffId=` for the raw availability check.
#[derive(Debug, Deserialize)]
pub struct AvailabilityParams {
    pub date: NaiveDate,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    #[serde(default, alias = "staffId")]
    pub staff_id: Option<DbId>,
}

/// `?date=&duration=&staffId=` for slot listing.
#[derive(Debug, Deserialize)]
pub struct SlotParams {
    pub date: NaiveDate,
    /// Appointment length in minutes.
    pub duration: u32,
    #[serde(default, alias = "staffId")]
    pub staff_id: Option<DbId>,
}
