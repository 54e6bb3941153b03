//! Repository for the `schedule_configurations` table.

use serde::Serialize;
use sqlx::types::Json;
use sqlx::PgConnection;

use barbershop_core::schedule::defaults::{default_operating_hours, default_work_breaks};
use barbershop_core::schedule::{BookingPolicy, OperatingHours, WorkBreak};
use barbershop_core::types::DbId;

use crate::models::schedule::ScheduleConfigRow;

/// Column list for `schedule_configurations` queries.
const COLUMNS: &str = "\
    id, tenant_id, operating_hours, work_breaks, booking_policy, \
    version, updated_at";

/// Provides data access for tenant schedule configurations.
pub struct ScheduleConfigRepo;

impl ScheduleConfigRepo {
    /// Whether a tenant with this id exists.
    pub async fn tenant_exists(conn: &mut PgConnection, tenant_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM tenants WHERE id = $1)")
            .bind(tenant_id)
            .fetch_one(conn)
            .await
    }

    /// Read the tenant's configuration row without locking it.
    pub async fn find_by_tenant(
        conn: &mut PgConnection,
        tenant_id: DbId,
    ) -> Result<Option<ScheduleConfigRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM schedule_configurations WHERE tenant_id = $1");
        sqlx::query_as::<_, ScheduleConfigRow>(&query)
            .bind(tenant_id)
            .fetch_optional(conn)
            .await
    }

    /// Lock the tenant's configuration row for the rest of the transaction,
    /// seeding defaults first if the tenant has none yet.
    ///
    /// Returns `None` if the tenant does not exist.
    pub async fn lock_or_seed(
        conn: &mut PgConnection,
        tenant_id: DbId,
    ) -> Result<Option<ScheduleConfigRow>, sqlx::Error> {
        if let Some(row) = Self::lock(&mut *conn, tenant_id).await? {
            return Ok(Some(row));
        }
        if !Self::tenant_exists(&mut *conn, tenant_id).await? {
            return Ok(None);
        }

        sqlx::query(
            "INSERT INTO schedule_configurations \
                 (tenant_id, operating_hours, work_breaks, booking_policy) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (tenant_id) DO NOTHING",
        )
        .bind(tenant_id)
        .bind(Json(default_operating_hours()))
        .bind(Json(default_work_breaks()))
        .bind(Json(BookingPolicy::default()))
        .execute(&mut *conn)
        .await?;
        tracing::info!(tenant_id, "Seeded default schedule configuration");

        Self::lock(conn, tenant_id).await
    }

    async fn lock(
        conn: &mut PgConnection,
        tenant_id: DbId,
    ) -> Result<Option<ScheduleConfigRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM schedule_configurations WHERE tenant_id = $1 FOR UPDATE"
        );
        sqlx::query_as::<_, ScheduleConfigRow>(&query)
            .bind(tenant_id)
            .fetch_optional(conn)
            .await
    }

    pub async fn replace_operating_hours(
        conn: &mut PgConnection,
        id: DbId,
        hours: &[OperatingHours],
    ) -> Result<ScheduleConfigRow, sqlx::Error> {
        Self::update_json(conn, id, "operating_hours", hours).await
    }

    pub async fn replace_work_breaks(
        conn: &mut PgConnection,
        id: DbId,
        breaks: &[WorkBreak],
    ) -> Result<ScheduleConfigRow, sqlx::Error> {
        Self::update_json(conn, id, "work_breaks", breaks).await
    }

    pub async fn update_booking_policy(
        conn: &mut PgConnection,
        id: DbId,
        policy: &BookingPolicy,
    ) -> Result<ScheduleConfigRow, sqlx::Error> {
        Self::update_json(conn, id, "booking_policy", policy).await
    }

    /// Bump version and `updated_at` after a block mutation.
    pub async fn touch(conn: &mut PgConnection, id: DbId) -> Result<ScheduleConfigRow, sqlx::Error> {
        let query = format!(
            "UPDATE schedule_configurations \
             SET version = version + 1, updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ScheduleConfigRow>(&query)
            .bind(id)
            .fetch_one(conn)
            .await
    }

    /// `column` is always one of the fixed JSONB column names above.
    async fn update_json<T>(
        conn: &mut PgConnection,
        id: DbId,
        column: &'static str,
        value: &T,
    ) -> Result<ScheduleConfigRow, sqlx::Error>
    where
        T: Serialize + Sync + ?Sized,
    {
        let query = format!(
            "UPDATE schedule_configurations \
             SET {column} = $2, version = version + 1, updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ScheduleConfigRow>(&query)
            .bind(id)
            .bind(Json(value))
            .fetch_one(conn)
            .await
    }
}
