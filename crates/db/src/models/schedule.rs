//! Rows for `schedule_configurations` and `schedule_blocks`.

use chrono::{NaiveDate, NaiveTime};
use sqlx::types::Json;
use sqlx::FromRow;

use barbershop_core::error::CoreError;
use barbershop_core::schedule::{
    BlockCategory, BookingPolicy, OperatingHours, ScheduleConfiguration, TemporaryBlock, WorkBreak,
};
use barbershop_core::time::TimeOfDay;
use barbershop_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `schedule_configurations` table.
#[derive(Debug, Clone, FromRow)]
pub struct ScheduleConfigRow {
    pub id: DbId,
    pub tenant_id: DbId,
    pub operating_hours: Json<Vec<OperatingHours>>,
    pub work_breaks: Json<Vec<WorkBreak>>,
    pub booking_policy: Json<BookingPolicy>,
    pub version: i64,
    pub updated_at: Timestamp,
}

impl ScheduleConfigRow {
    /// Combine the aggregate row with its blocks.
    pub fn into_configuration(self, blocks: Vec<TemporaryBlock>) -> ScheduleConfiguration {
        ScheduleConfiguration {
            id: self.id,
            tenant_id: self.tenant_id,
            operating_hours: self.operating_hours.0,
            work_breaks: self.work_breaks.0,
            blocks,
            booking_policy: self.booking_policy.0,
            version: self.version,
            updated_at: self.updated_at,
        }
    }
}

/// A row from the `schedule_blocks` table.
#[derive(Debug, Clone, FromRow)]
pub struct BlockRow {
    pub id: DbId,
    pub tenant_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub staff_ids: Vec<DbId>,
    pub category: String,
    pub is_active: bool,
    pub created_at: Timestamp,
}

impl TryFrom<BlockRow> for TemporaryBlock {
    type Error = CoreError;

    fn try_from(row: BlockRow) -> Result<Self, Self::Error> {
        let category = BlockCategory::from_str_value(&row.category).ok_or_else(|| {
            CoreError::Internal(format!(
                "block {} has unknown category '{}'",
                row.id, row.category
            ))
        })?;
        Ok(TemporaryBlock {
            id: row.id,
            tenant_id: row.tenant_id,
            title: row.title,
            description: row.description,
            start_date: row.start_date,
            end_date: row.end_date,
            start_time: row.start_time.map(TimeOfDay::from),
            end_time: row.end_time.map(TimeOfDay::from),
            staff_ids: row.staff_ids.into_iter().collect(),
            category,
            is_active: row.is_active,
            created_at: row.created_at,
        })
    }
}
