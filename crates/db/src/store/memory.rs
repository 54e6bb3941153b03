//! In-memory store for tests and local development.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use barbershop_core::error::CoreError;
use barbershop_core::schedule::model::assign_break_ids;
use barbershop_core::schedule::validation::{
    validate_block_input, validate_booking_policy, validate_operating_hours, validate_work_breaks,
};
use barbershop_core::schedule::{
    BlockInput, BlockPatch, BookingPolicy, OperatingHours, ScheduleConfiguration, StaffMember,
    TemporaryBlock, WorkBreakInput,
};
use barbershop_core::types::{DbId, Timestamp};

use super::ScheduleStore;
use crate::error::StoreResult;

/// Store backed by a process-local map. Cloning shares the same data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    data: Arc<RwLock<MemoryData>>,
}

#[derive(Default)]
struct MemoryData {
    tenants: BTreeMap<DbId, TenantData>,
    last_config_id: DbId,
    last_block_id: DbId,
    last_staff_id: DbId,
}

#[derive(Default)]
struct TenantData {
    config: Option<ScheduleConfiguration>,
    staff: Vec<StaffMember>,
    idempotency_keys: HashMap<Uuid, DbId>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tenant. Its configuration is seeded on first access.
    pub async fn add_tenant(&self, tenant_id: DbId) {
        self.data.write().await.tenants.entry(tenant_id).or_default();
    }

    /// Add a staff member to a tenant's roster.
    pub async fn add_staff(&self, tenant_id: DbId, name: &str) -> StoreResult<StaffMember> {
        let mut guard = self.data.write().await;
        let data = &mut *guard;
        let tenant = data.tenants.get_mut(&tenant_id).ok_or(CoreError::NotFound {
            entity: "Tenant",
            id: tenant_id,
        })?;
        data.last_staff_id += 1;
        let member = StaffMember {
            id: data.last_staff_id,
            name: name.to_string(),
        };
        tenant.staff.push(member.clone());
        Ok(member)
    }
}

impl MemoryData {
    /// The tenant's configuration, seeded with defaults if missing.
    fn config_mut(
        &mut self,
        tenant_id: DbId,
        now: Timestamp,
    ) -> StoreResult<&mut ScheduleConfiguration> {
        let tenant = self.tenants.get_mut(&tenant_id).ok_or(CoreError::NotFound {
            entity: "Tenant",
            id: tenant_id,
        })?;
        if tenant.config.is_none() {
            self.last_config_id += 1;
            tracing::info!(tenant_id, "Seeded default schedule configuration");
            tenant.config = Some(ScheduleConfiguration::seeded(
                self.last_config_id,
                tenant_id,
                now,
            ));
        }
        Ok(tenant
            .config
            .as_mut()
            .ok_or_else(|| CoreError::Internal("configuration missing after seeding".into()))?)
    }

    /// The block a previous request with `key` created, if it still exists.
    fn replayed_block(&self, tenant_id: DbId, key: Uuid) -> Option<TemporaryBlock> {
        let tenant = self.tenants.get(&tenant_id)?;
        let block_id = tenant.idempotency_keys.get(&key)?;
        tenant.config.as_ref()?.block(*block_id).cloned()
    }

    /// Tenant owning `block_id`, searching seeded configurations only.
    fn tenant_of_block(&self, block_id: DbId) -> StoreResult<DbId> {
        self.tenants
            .iter()
            .find(|(_, tenant)| {
                tenant
                    .config
                    .as_ref()
                    .is_some_and(|config| config.block(block_id).is_some())
            })
            .map(|(id, _)| *id)
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "TemporaryBlock",
                    id: block_id,
                }
                .into()
            })
    }
}

#[async_trait]
impl ScheduleStore for InMemoryStore {
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn get_configuration(&self, tenant_id: DbId) -> StoreResult<ScheduleConfiguration> {
        let mut data = self.data.write().await;
        Ok(data.config_mut(tenant_id, Utc::now())?.clone())
    }

    async fn replace_operating_hours(
        &self,
        tenant_id: DbId,
        hours: Vec<OperatingHours>,
        expected_version: Option<i64>,
    ) -> StoreResult<ScheduleConfiguration> {
        validate_operating_hours(&hours)?;

        let now = Utc::now();
        let mut data = self.data.write().await;
        let config = data.config_mut(tenant_id, now)?;
        config.check_version(expected_version)?;
        config.operating_hours = hours;
        config.touch(now);
        Ok(config.clone())
    }

    async fn replace_work_breaks(
        &self,
        tenant_id: DbId,
        breaks: Vec<WorkBreakInput>,
        expected_version: Option<i64>,
    ) -> StoreResult<ScheduleConfiguration> {
        validate_work_breaks(&breaks)?;
        let breaks = assign_break_ids(breaks)?;

        let now = Utc::now();
        let mut data = self.data.write().await;
        let config = data.config_mut(tenant_id, now)?;
        config.check_version(expected_version)?;
        config.work_breaks = breaks;
        config.touch(now);
        Ok(config.clone())
    }

    async fn update_booking_policy(
        &self,
        tenant_id: DbId,
        policy: BookingPolicy,
        expected_version: Option<i64>,
    ) -> StoreResult<ScheduleConfiguration> {
        validate_booking_policy(&policy)?;

        let now = Utc::now();
        let mut data = self.data.write().await;
        let config = data.config_mut(tenant_id, now)?;
        config.check_version(expected_version)?;
        config.booking_policy = policy;
        config.touch(now);
        Ok(config.clone())
    }

    async fn create_block(
        &self,
        tenant_id: DbId,
        input: BlockInput,
        idempotency_key: Option<Uuid>,
        expected_version: Option<i64>,
    ) -> StoreResult<TemporaryBlock> {
        validate_block_input(&input)?;

        let now = Utc::now();
        let mut guard = self.data.write().await;
        let data = &mut *guard;
        let version_check = data
            .config_mut(tenant_id, now)?
            .check_version(expected_version);

        if let Some(key) = idempotency_key {
            if let Some(block) = data.replayed_block(tenant_id, key) {
                tracing::debug!(tenant_id, block_id = block.id, %key, "Replayed block creation");
                return Ok(block);
            }
        }
        version_check?;

        data.last_block_id += 1;
        let block = TemporaryBlock {
            id: data.last_block_id,
            tenant_id,
            title: input.title,
            description: input.description,
            start_date: input.start_date,
            end_date: input.end_date,
            start_time: input.start_time,
            end_time: input.end_time,
            staff_ids: input.staff_ids,
            category: input.category,
            is_active: true,
            created_at: now,
        };

        let tenant = data.tenants.get_mut(&tenant_id).ok_or(CoreError::NotFound {
            entity: "Tenant",
            id: tenant_id,
        })?;
        if let Some(key) = idempotency_key {
            tenant.idempotency_keys.insert(key, block.id);
        }
        let config = tenant
            .config
            .as_mut()
            .ok_or_else(|| CoreError::Internal("configuration missing after seeding".into()))?;
        config.blocks.push(block.clone());
        config.touch(now);
        Ok(block)
    }

    async fn update_block(
        &self,
        block_id: DbId,
        patch: BlockPatch,
        expected_version: Option<i64>,
    ) -> StoreResult<TemporaryBlock> {
        let now = Utc::now();
        let mut data = self.data.write().await;
        let tenant_id = data.tenant_of_block(block_id)?;
        let config = data.config_mut(tenant_id, now)?;
        config.check_version(expected_version)?;

        let index = config
            .blocks
            .iter()
            .position(|b| b.id == block_id)
            .ok_or(CoreError::NotFound {
                entity: "TemporaryBlock",
                id: block_id,
            })?;
        let (merged, is_active) = patch.merge(&config.blocks[index]);
        validate_block_input(&merged)?;

        let block = &mut config.blocks[index];
        block.title = merged.title;
        block.description = merged.description;
        block.start_date = merged.start_date;
        block.end_date = merged.end_date;
        block.start_time = merged.start_time;
        block.end_time = merged.end_time;
        block.staff_ids = merged.staff_ids;
        block.category = merged.category;
        block.is_active = is_active;
        let updated = block.clone();

        config.touch(now);
        Ok(updated)
    }

    async fn delete_block(&self, block_id: DbId, expected_version: Option<i64>) -> StoreResult<()> {
        let now = Utc::now();
        let mut data = self.data.write().await;
        let tenant_id = data.tenant_of_block(block_id)?;
        let config = data.config_mut(tenant_id, now)?;
        config.check_version(expected_version)?;
        config.blocks.retain(|b| b.id != block_id);
        config.touch(now);
        Ok(())
    }

    async fn list_staff(&self, tenant_id: DbId) -> StoreResult<Vec<StaffMember>> {
        let data = self.data.read().await;
        let tenant = data.tenants.get(&tenant_id).ok_or(CoreError::NotFound {
            entity: "Tenant",
            id: tenant_id,
        })?;
        let mut staff = tenant.staff.clone();
        staff.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(staff)
    }
}
