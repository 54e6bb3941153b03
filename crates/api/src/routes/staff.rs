use axum::routing::get;
use axum::Router;

use crate::handlers::staff;
use crate::state::AppState;

/// Staff roster routes.
///
/// ```text
/// GET /tenants/{tenant_id}/staff    list_staff
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/tenants/{tenant_id}/staff", get(staff::list_staff))
}
