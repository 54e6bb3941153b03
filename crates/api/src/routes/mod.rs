pub mod availability;
pub mod health;
pub mod schedule_config;
pub mod staff;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /tenants/{tenant_id}/schedule-config              get (seeds defaults on first access)
/// /tenants/{tenant_id}/schedule-config/hours        replace operating hours (PUT)
/// /tenants/{tenant_id}/schedule-config/breaks       replace work breaks (PUT)
/// /tenants/{tenant_id}/schedule-config/policy       replace booking policy (PUT)
/// /tenants/{tenant_id}/schedule-config/blocks       create block (POST)
///
/// /schedule-config/blocks/{block_id}                patch, delete
///
/// /tenants/{tenant_id}/availability                 raw availability (?date, start, end, staffId)
/// /tenants/{tenant_id}/availability/slots           bookable start times (?date, duration, staffId)
/// /tenants/{tenant_id}/booking-check                full booking rule check (POST)
///
/// /tenants/{tenant_id}/staff                        active staff roster
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(schedule_config::router())
        .merge(availability::router())
        .merge(staff::router())
}
