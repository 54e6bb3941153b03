//! Repository for the `schedule_blocks` table.

use sqlx::PgConnection;
use uuid::Uuid;

use barbershop_core::schedule::BlockInput;
use barbershop_core::time::TimeOfDay;
use barbershop_core::types::DbId;

use crate::models::schedule::BlockRow;

/// Column list for `schedule_blocks` queries.
const COLUMNS: &str = "\
    id, tenant_id, title, description, start_date, end_date, \
    start_time, end_time, staff_ids, category, is_active, created_at";

/// Provides data access for temporary schedule blocks.
pub struct BlockRepo;

impl BlockRepo {
    /// List all blocks of a tenant, oldest first.
    pub async fn list_by_tenant(
        conn: &mut PgConnection,
        tenant_id: DbId,
    ) -> Result<Vec<BlockRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM schedule_blocks WHERE tenant_id = $1 ORDER BY start_date, id"
        );
        sqlx::query_as::<_, BlockRow>(&query)
            .bind(tenant_id)
            .fetch_all(conn)
            .await
    }

    /// Find a block by its internal id.
    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<BlockRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM schedule_blocks WHERE id = $1");
        sqlx::query_as::<_, BlockRow>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Find a block previously created with the given idempotency key.
    pub async fn find_by_idempotency_key(
        conn: &mut PgConnection,
        tenant_id: DbId,
        key: Uuid,
    ) -> Result<Option<BlockRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM schedule_blocks \
             WHERE tenant_id = $1 AND idempotency_key = $2"
        );
        sqlx::query_as::<_, BlockRow>(&query)
            .bind(tenant_id)
            .bind(key)
            .fetch_optional(conn)
            .await
    }

    /// Insert a new active block, returning the created row.
    pub async fn create(
        conn: &mut PgConnection,
        tenant_id: DbId,
        input: &BlockInput,
        idempotency_key: Option<Uuid>,
    ) -> Result<BlockRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO schedule_blocks \
                 (tenant_id, title, description, start_date, end_date, \
                  start_time, end_time, staff_ids, category, idempotency_key) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BlockRow>(&query)
            .bind(tenant_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.start_time.map(TimeOfDay::to_naive_time))
            .bind(input.end_time.map(TimeOfDay::to_naive_time))
            .bind(input.staff_ids.iter().copied().collect::<Vec<DbId>>())
            .bind(input.category.as_str())
            .bind(idempotency_key)
            .fetch_one(conn)
            .await
    }

    /// Overwrite every editable field of a block with an already-merged input.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        input: &BlockInput,
        is_active: bool,
    ) -> Result<Option<BlockRow>, sqlx::Error> {
        let query = format!(
            "UPDATE schedule_blocks SET \
                 title = $2, description = $3, start_date = $4, end_date = $5, \
                 start_time = $6, end_time = $7, staff_ids = $8, category = $9, \
                 is_active = $10, updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BlockRow>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.start_time.map(TimeOfDay::to_naive_time))
            .bind(input.end_time.map(TimeOfDay::to_naive_time))
            .bind(input.staff_ids.iter().copied().collect::<Vec<DbId>>())
            .bind(input.category.as_str())
            .bind(is_active)
            .fetch_optional(conn)
            .await
    }

    /// Delete a block. Returns `true` if a row was removed.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM schedule_blocks WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
