//! Handlers for tenant schedule configuration.
//!
//! Hours and breaks are replaced as whole collections; blocks have granular
//! create/patch/delete. Every mutation honours `If-Match` and answers with
//! the new aggregate version in `ETag`.

use axum::extract::State;
use axum::http::header::ETAG;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use barbershop_core::schedule::{
    BlockInput, BlockPatch, BookingPolicy, OperatingHours, ScheduleConfiguration, WorkBreakInput,
};
use barbershop_core::types::DbId;

use crate::error::AppResult;
use crate::middleware::concurrency::{ExpectedVersion, IdempotencyKey};
use crate::middleware::payload::{AppJson, AppPath};
use crate::response::DataResponse;
use crate::state::AppState;

/// Respond with the aggregate and its version as an entity tag.
fn config_response(config: ScheduleConfiguration) -> impl IntoResponse {
    let etag = format!("\"{}\"", config.version);
    ([(ETAG, etag)], Json(DataResponse { data: config }))
}

// ---------------------------------------------------------------------------
// GET /tenants/{tenant_id}/schedule-config
// ---------------------------------------------------------------------------

/// Get a tenant's configuration, seeding defaults on first access.
pub async fn get_configuration(
    State(state): State<AppState>,
    AppPath(tenant_id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let config = state.store.get_configuration(tenant_id).await?;
    Ok(config_response(config))
}

// ---------------------------------------------------------------------------
// PUT /tenants/{tenant_id}/schedule-config/hours
// ---------------------------------------------------------------------------

/// Replace the weekly operating-hours table (exactly seven entries).
pub async fn replace_operating_hours(
    State(state): State<AppState>,
    AppPath(tenant_id): AppPath<DbId>,
    ExpectedVersion(expected_version): ExpectedVersion,
    AppJson(hours): AppJson<Vec<OperatingHours>>,
) -> AppResult<impl IntoResponse> {
    let config = state
        .store
        .replace_operating_hours(tenant_id, hours, expected_version)
        .await?;

    tracing::info!(tenant_id, version = config.version, "Operating hours replaced");

    Ok(config_response(config))
}

// ---------------------------------------------------------------------------
// PUT /tenants/{tenant_id}/schedule-config/breaks
// ---------------------------------------------------------------------------

/// Replace the recurring break list.
pub async fn replace_work_breaks(
    State(state): State<AppState>,
    AppPath(tenant_id): AppPath<DbId>,
    ExpectedVersion(expected_version): ExpectedVersion,
    AppJson(breaks): AppJson<Vec<WorkBreakInput>>,
) -> AppResult<impl IntoResponse> {
    let config = state
        .store
        .replace_work_breaks(tenant_id, breaks, expected_version)
        .await?;

    tracing::info!(
        tenant_id,
        count = config.work_breaks.len(),
        version = config.version,
        "Work breaks replaced"
    );

    Ok(config_response(config))
}

// ---------------------------------------------------------------------------
// PUT /tenants/{tenant_id}/schedule-config/policy
// ---------------------------------------------------------------------------

pub async fn update_booking_policy(
    State(state): State<AppState>,
    AppPath(tenant_id): AppPath<DbId>,
    ExpectedVersion(expected_version): ExpectedVersion,
    AppJson(policy): AppJson<BookingPolicy>,
) -> AppResult<impl IntoResponse> {
    let config = state
        .store
        .update_booking_policy(tenant_id, policy, expected_version)
        .await?;

    tracing::info!(tenant_id, version = config.version, "Booking policy updated");

    Ok(config_response(config))
}

// ---------------------------------------------------------------------------
// POST /tenants/{tenant_id}/schedule-config/blocks
// ---------------------------------------------------------------------------

/// Create a temporary block. Retries carrying the same `Idempotency-Key`
/// return the block from the first request.
pub async fn create_block(
    State(state): State<AppState>,
    AppPath(tenant_id): AppPath<DbId>,
    ExpectedVersion(expected_version): ExpectedVersion,
    IdempotencyKey(idempotency_key): IdempotencyKey,
    AppJson(input): AppJson<BlockInput>,
) -> AppResult<impl IntoResponse> {
    let block = state
        .store
        .create_block(tenant_id, input, idempotency_key, expected_version)
        .await?;

    tracing::info!(
        tenant_id,
        block_id = block.id,
        category = block.category.as_str(),
        "Temporary block created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: block })))
}

// ---------------------------------------------------------------------------
// PATCH /schedule-config/blocks/{block_id}
// ---------------------------------------------------------------------------

/// Apply a partial update to a block. Omitted fields keep their values;
/// explicit `null` clears optional ones.
pub async fn update_block(
    State(state): State<AppState>,
    AppPath(block_id): AppPath<DbId>,
    ExpectedVersion(expected_version): ExpectedVersion,
    AppJson(patch): AppJson<BlockPatch>,
) -> AppResult<impl IntoResponse> {
    let block = state
        .store
        .update_block(block_id, patch, expected_version)
        .await?;

    tracing::info!(block_id, tenant_id = block.tenant_id, "Temporary block updated");

    Ok(Json(DataResponse { data: block }))
}

// ---------------------------------------------------------------------------
// DELETE /schedule-config/blocks/{block_id}
// ---------------------------------------------------------------------------

pub async fn delete_block(
    State(state): State<AppState>,
    AppPath(block_id): AppPath<DbId>,
    ExpectedVersion(expected_version): ExpectedVersion,
) -> AppResult<StatusCode> {
    state.store.delete_block(block_id, expected_version).await?;

    tracing::info!(block_id, "Temporary block deleted");

    Ok(StatusCode::NO_CONTENT)
}
