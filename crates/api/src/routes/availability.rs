//! Route definitions for availability and booking checks.
//!
//! ```text
//! GET  /tenants/{tenant_id}/availability         check_availability (?date, start, end, staffId)
//! GET  /tenants/{tenant_id}/availability/slots   list_slots (?date, duration, staffId)
//! POST /tenants/{tenant_id}/booking-check        check_booking
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::availability;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/tenants/{tenant_id}/availability",
            get(availability::check_availability),
        )
        .route(
            "/tenants/{tenant_id}/availability/slots",
            get(availability::list_slots),
        )
        .route(
            "/tenants/{tenant_id}/booking-check",
            post(availability::check_booking),
        )
}
