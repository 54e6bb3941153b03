//! Repository for the `staff_members` table (read-only roster lookups).

use sqlx::PgPool;

use barbershop_core::types::DbId;

use crate::models::staff::StaffRow;

/// Provides read access to a tenant's staff roster.
pub struct StaffRepo;

impl StaffRepo {
    /// List active staff members for a tenant, ordered by name.
    pub async fn list_active(pool: &PgPool, tenant_id: DbId) -> Result<Vec<StaffRow>, sqlx::Error> {
        sqlx::query_as::<_, StaffRow>(
            "SELECT id, name FROM staff_members \
             WHERE tenant_id = $1 AND is_active = true \
             ORDER BY name, id",
        )
        .bind(tenant_id)
        .fetch_all(pool)
        .await
    }
}
