//! The configuration store boundary.
//!
//! Every mutation validates its input before writing, is atomic, bumps the
//! aggregate `version` and `updated_at`, and accepts an optional expected
//! version for optimistic concurrency.

mod memory;
mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use barbershop_core::schedule::{
    BlockInput, BlockPatch, BookingPolicy, OperatingHours, ScheduleConfiguration, StaffMember,
    TemporaryBlock, WorkBreakInput,
};
use barbershop_core::types::DbId;

use crate::error::StoreResult;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

/// CRUD for tenant schedule configurations.
///
/// Unknown tenants fail with `NotFound`; a known tenant without a
/// configuration gets the default one seeded on first access.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Check that the backing store is reachable.
    async fn health_check(&self) -> StoreResult<()>;

    async fn get_configuration(&self, tenant_id: DbId) -> StoreResult<ScheduleConfiguration>;

    /// Replace the whole operating-hours table.
    async fn replace_operating_hours(
        &self,
        tenant_id: DbId,
        hours: Vec<OperatingHours>,
        expected_version: Option<i64>,
    ) -> StoreResult<ScheduleConfiguration>;

    /// Replace the whole break list. Entries without an id get a new one.
    async fn replace_work_breaks(
        &self,
        tenant_id: DbId,
        breaks: Vec<WorkBreakInput>,
        expected_version: Option<i64>,
    ) -> StoreResult<ScheduleConfiguration>;

    async fn update_booking_policy(
        &self,
        tenant_id: DbId,
        policy: BookingPolicy,
        expected_version: Option<i64>,
    ) -> StoreResult<ScheduleConfiguration>;

    /// Create an active block.
    ///
    /// Repeating a request with the same `idempotency_key` returns the block
    /// created by the first request, as long as it still exists.
    async fn create_block(
        &self,
        tenant_id: DbId,
        input: BlockInput,
        idempotency_key: Option<Uuid>,
        expected_version: Option<i64>,
    ) -> StoreResult<TemporaryBlock>;

    /// Merge `patch` over the block and re-validate the result.
    async fn update_block(
        &self,
        block_id: DbId,
        patch: BlockPatch,
        expected_version: Option<i64>,
    ) -> StoreResult<TemporaryBlock>;

    async fn delete_block(&self, block_id: DbId, expected_version: Option<i64>) -> StoreResult<()>;

    /// Active staff of a tenant, for block staff selection.
    async fn list_staff(&self, tenant_id: DbId) -> StoreResult<Vec<StaffMember>>;
}
