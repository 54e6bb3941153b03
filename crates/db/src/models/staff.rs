//! Rows for `staff_members`.

use sqlx::FromRow;

use barbershop_core::schedule::StaffMember;
use barbershop_core::types::DbId;

/// Roster projection of a `staff_members` row.
#[derive(Debug, Clone, FromRow)]
pub struct StaffRow {
    pub id: DbId,
    pub name: String,
}

impl From<StaffRow> for StaffMember {
    fn from(row: StaffRow) -> Self {
        StaffMember {
            id: row.id,
            name: row.name,
        }
    }
}
