//! Route definitions for tenant schedule configuration.
//!
//! ```text
//! GET    /tenants/{tenant_id}/schedule-config          get_configuration
//! PUT    /tenants/{tenant_id}/schedule-config/hours    replace_operating_hours
//! PUT    /tenants/{tenant_id}/schedule-config/breaks   replace_work_breaks
//! PUT    /tenants/{tenant_id}/schedule-config/policy   update_booking_policy
//! POST   /tenants/{tenant_id}/schedule-config/blocks   create_block
//! PATCH  /schedule-config/blocks/{block_id}            update_block
//! DELETE /schedule-config/blocks/{block_id}            delete_block
//! ```

use axum::routing::{get, patch, post, put};
use axum::Router;

use crate::handlers::schedule_config;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/tenants/{tenant_id}/schedule-config",
            get(schedule_config::get_configuration),
        )
        .route(
            "/tenants/{tenant_id}/schedule-config/hours",
            put(schedule_config::replace_operating_hours),
        )
        .route(
            "/tenants/{tenant_id}/schedule-config/breaks",
            put(schedule_config::replace_work_breaks),
        )
        .route(
            "/tenants/{tenant_id}/schedule-config/policy",
            put(schedule_config::update_booking_policy),
        )
        .route(
            "/tenants/{tenant_id}/schedule-config/blocks",
            post(schedule_config::create_block),
        )
        .route(
            "/schedule-config/blocks/{block_id}",
            patch(schedule_config::update_block).delete(schedule_config::delete_block),
        )
}
