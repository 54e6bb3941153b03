//! PostgreSQL-backed store.
//!
//! Every mutation runs in one transaction that first locks the tenant's
//! `schedule_configurations` row, so concurrent mutations of the same
//! aggregate serialize and version checks cannot race. Reads use a
//! read-only snapshot and only lock when they have to seed defaults.

use async_trait::async_trait;
use sqlx::{PgConnection, Postgres, Transaction};
use uuid::Uuid;

use barbershop_core::error::CoreError;
use barbershop_core::schedule::model::{assign_break_ids, ensure_version};
use barbershop_core::schedule::validation::{
    validate_block_input, validate_booking_policy, validate_operating_hours, validate_work_breaks,
};
use barbershop_core::schedule::{
    BlockInput, BlockPatch, BookingPolicy, OperatingHours, ScheduleConfiguration, StaffMember,
    TemporaryBlock, WorkBreakInput,
};
use barbershop_core::types::DbId;

use super::ScheduleStore;
use crate::error::StoreResult;
use crate::models::schedule::{BlockRow, ScheduleConfigRow};
use crate::repositories::{BlockRepo, ScheduleConfigRepo, StaffRepo};
use crate::DbPool;

/// Store backed by a PostgreSQL pool.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    async fn begin(&self) -> StoreResult<Transaction<'static, Postgres>> {
        Ok(self.pool.begin().await?)
    }
}

/// Lock (or seed) the tenant's aggregate row and check the caller's version.
async fn lock_config(
    conn: &mut PgConnection,
    tenant_id: DbId,
    expected_version: Option<i64>,
) -> StoreResult<ScheduleConfigRow> {
    let row = ScheduleConfigRepo::lock_or_seed(conn, tenant_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Tenant",
            id: tenant_id,
        })?;
    ensure_version(row.version, expected_version)?;
    Ok(row)
}

async fn load_blocks(conn: &mut PgConnection, tenant_id: DbId) -> StoreResult<Vec<TemporaryBlock>> {
    let rows = BlockRepo::list_by_tenant(conn, tenant_id).await?;
    Ok(rows
        .into_iter()
        .map(TemporaryBlock::try_from)
        .collect::<Result<Vec<_>, _>>()?)
}

async fn assemble(
    conn: &mut PgConnection,
    row: ScheduleConfigRow,
) -> StoreResult<ScheduleConfiguration> {
    let blocks = load_blocks(conn, row.tenant_id).await?;
    Ok(row.into_configuration(blocks))
}

/// Look up a block's owning tenant; blocks are addressed by id alone.
async fn block_owner(conn: &mut PgConnection, block_id: DbId) -> StoreResult<BlockRow> {
    BlockRepo::find_by_id(conn, block_id).await?.ok_or_else(|| {
        CoreError::NotFound {
            entity: "TemporaryBlock",
            id: block_id,
        }
        .into()
    })
}

#[async_trait]
impl ScheduleStore for PgStore {
    async fn health_check(&self) -> StoreResult<()> {
        Ok(crate::health_check(&self.pool).await?)
    }

    async fn get_configuration(&self, tenant_id: DbId) -> StoreResult<ScheduleConfiguration> {
        // Snapshot read, no row lock.
        let mut tx = self.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;
        if let Some(row) = ScheduleConfigRepo::find_by_tenant(&mut tx, tenant_id).await? {
            let config = assemble(&mut tx, row).await?;
            tx.commit().await?;
            return Ok(config);
        }
        tx.commit().await?;

        // First access: seeding needs a write transaction.
        let mut tx = self.begin().await?;
        let row = lock_config(&mut tx, tenant_id, None).await?;
        let config = assemble(&mut tx, row).await?;
        tx.commit().await?;
        Ok(config)
    }

    async fn replace_operating_hours(
        &self,
        tenant_id: DbId,
        hours: Vec<OperatingHours>,
        expected_version: Option<i64>,
    ) -> StoreResult<ScheduleConfiguration> {
        validate_operating_hours(&hours)?;

        let mut tx = self.begin().await?;
        let row = lock_config(&mut tx, tenant_id, expected_version).await?;
        let row = ScheduleConfigRepo::replace_operating_hours(&mut tx, row.id, &hours).await?;
        let config = assemble(&mut tx, row).await?;
        tx.commit().await?;
        Ok(config)
    }

    async fn replace_work_breaks(
        &self,
        tenant_id: DbId,
        breaks: Vec<WorkBreakInput>,
        expected_version: Option<i64>,
    ) -> StoreResult<ScheduleConfiguration> {
        validate_work_breaks(&breaks)?;
        let breaks = assign_break_ids(breaks)?;

        let mut tx = self.begin().await?;
        let row = lock_config(&mut tx, tenant_id, expected_version).await?;
        let row = ScheduleConfigRepo::replace_work_breaks(&mut tx, row.id, &breaks).await?;
        let config = assemble(&mut tx, row).await?;
        tx.commit().await?;
        Ok(config)
    }

    async fn update_booking_policy(
        &self,
        tenant_id: DbId,
        policy: BookingPolicy,
        expected_version: Option<i64>,
    ) -> StoreResult<ScheduleConfiguration> {
        validate_booking_policy(&policy)?;

        let mut tx = self.begin().await?;
        let row = lock_config(&mut tx, tenant_id, expected_version).await?;
        let row = ScheduleConfigRepo::update_booking_policy(&mut tx, row.id, &policy).await?;
        let config = assemble(&mut tx, row).await?;
        tx.commit().await?;
        Ok(config)
    }

    async fn create_block(
        &self,
        tenant_id: DbId,
        input: BlockInput,
        idempotency_key: Option<Uuid>,
        expected_version: Option<i64>,
    ) -> StoreResult<TemporaryBlock> {
        validate_block_input(&input)?;

        let mut tx = self.begin().await?;
        let row = lock_config(&mut tx, tenant_id, None).await?;

        if let Some(key) = idempotency_key {
            if let Some(existing) = BlockRepo::find_by_idempotency_key(&mut tx, tenant_id, key).await? {
                tx.commit().await?;
                tracing::debug!(tenant_id, block_id = existing.id, %key, "Replayed block creation");
                return Ok(TemporaryBlock::try_from(existing)?);
            }
        }
        ensure_version(row.version, expected_version)?;

        let created = BlockRepo::create(&mut tx, tenant_id, &input, idempotency_key).await?;
        ScheduleConfigRepo::touch(&mut tx, row.id).await?;
        tx.commit().await?;
        Ok(TemporaryBlock::try_from(created)?)
    }

    async fn update_block(
        &self,
        block_id: DbId,
        patch: BlockPatch,
        expected_version: Option<i64>,
    ) -> StoreResult<TemporaryBlock> {
        let mut tx = self.begin().await?;
        let tenant_id = block_owner(&mut tx, block_id).await?.tenant_id;
        let row = lock_config(&mut tx, tenant_id, expected_version).await?;

        // Re-read under the aggregate lock.
        let current = TemporaryBlock::try_from(block_owner(&mut tx, block_id).await?)?;
        let (merged, is_active) = patch.merge(&current);
        validate_block_input(&merged)?;

        let updated = BlockRepo::update(&mut tx, block_id, &merged, is_active)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "TemporaryBlock",
                id: block_id,
            })?;
        ScheduleConfigRepo::touch(&mut tx, row.id).await?;
        tx.commit().await?;
        Ok(TemporaryBlock::try_from(updated)?)
    }

    async fn delete_block(&self, block_id: DbId, expected_version: Option<i64>) -> StoreResult<()> {
        let mut tx = self.begin().await?;
        let tenant_id = block_owner(&mut tx, block_id).await?.tenant_id;
        let row = lock_config(&mut tx, tenant_id, expected_version).await?;

        if !BlockRepo::delete(&mut tx, block_id).await? {
            return Err(CoreError::NotFound {
                entity: "TemporaryBlock",
                id: block_id,
            }
            .into());
        }
        ScheduleConfigRepo::touch(&mut tx, row.id).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn list_staff(&self, tenant_id: DbId) -> StoreResult<Vec<StaffMember>> {
        let mut conn = self.pool.acquire().await?;
        if !ScheduleConfigRepo::tenant_exists(&mut conn, tenant_id).await? {
            return Err(CoreError::NotFound {
                entity: "Tenant",
                id: tenant_id,
            }
            .into());
        }
        drop(conn);

        let rows = StaffRepo::list_active(&self.pool, tenant_id).await?;
        Ok(rows.into_iter().map(StaffMember::from).collect())
    }
}
