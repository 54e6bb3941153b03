//! Handlers for availability queries.
//!
//! `GET /availability` answers the raw question (hours and blocks only).
//! `POST /booking-check` and `GET /availability/slots` also apply the
//! booking policy and recurring breaks.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use barbershop_core::schedule::validation::validate_interval;
use barbershop_core::schedule::{available_slots, evaluate_booking, is_bookable, BookingRequest};
use barbershop_core::time::TimeOfDay;
use barbershop_core::types::DbId;

use crate::error::AppResult;
use crate::middleware::payload::{AppJson, AppPath, AppQuery};
use crate::query::{AvailabilityParams, SlotParams};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub bookable: bool,
}

#[derive(Debug, Serialize)]
pub struct SlotsResponse {
    pub date: chrono::NaiveDate,
    pub duration: u32,
    pub slots: Vec<TimeOfDay>,
}

// ---------------------------------------------------------------------------
// GET /tenants/{tenant_id}/availability
// ---------------------------------------------------------------------------

pub async fn check_availability(
    State(state): State<AppState>,
    AppPath(tenant_id): AppPath<DbId>,
    AppQuery(params): AppQuery<AvailabilityParams>,
) -> AppResult<impl IntoResponse> {
    validate_interval(params.start, params.end)?;

    let config = state.store.get_configuration(tenant_id).await?;
    let bookable = is_bookable(
        &config,
        params.date,
        params.start,
        params.end,
        params.staff_id,
    );

    tracing::debug!(
        tenant_id,
        date = %params.date,
        start = %params.start,
        end = %params.end,
        staff_id = ?params.staff_id,
        bookable,
        "Availability checked"
    );

    Ok(Json(DataResponse {
        data: AvailabilityResponse { bookable },
    }))
}

// ---------------------------------------------------------------------------
// GET /tenants/{tenant_id}/availability/slots
// ---------------------------------------------------------------------------

pub async fn list_slots(
    State(state): State<AppState>,
    AppPath(tenant_id): AppPath<DbId>,
    AppQuery(params): AppQuery<SlotParams>,
) -> AppResult<impl IntoResponse> {
    let config = state.store.get_configuration(tenant_id).await?;
    let slots = available_slots(&config, params.date, params.duration, params.staff_id)?;

    tracing::debug!(tenant_id, date = %params.date, count = slots.len(), "Listed slots");

    Ok(Json(DataResponse {
        data: SlotsResponse {
            date: params.date,
            duration: params.duration,
            slots,
        },
    }))
}

// ---------------------------------------------------------------------------
// POST /tenants/{tenant_id}/booking-check
// ---------------------------------------------------------------------------

/// Evaluate a prospective booking against every rule, at shop-local "now".
pub async fn check_booking(
    State(state): State<AppState>,
    AppPath(tenant_id): AppPath<DbId>,
    AppJson(request): AppJson<BookingRequest>,
) -> AppResult<impl IntoResponse> {
    let config = state.store.get_configuration(tenant_id).await?;
    let verdict = evaluate_booking(&config, &request, state.config.shop_now())?;

    tracing::debug!(
        tenant_id,
        date = %request.date,
        bookable = verdict.bookable,
        reason = ?verdict.reason,
        "Booking checked"
    );

    Ok(Json(DataResponse { data: verdict }))
}
