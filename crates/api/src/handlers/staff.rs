//! Staff roster for block staff selection.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use barbershop_core::error::CoreError;
use barbershop_core::types::DbId;
use barbershop_db::StoreError;

use crate::error::AppResult;
use crate::middleware::payload::AppPath;
use crate::response::DataResponse;
use crate::state::AppState;

/// List a tenant's active staff.
///
/// The roster is an optional read: an unknown tenant is still a 404, but a
/// store failure is logged and answered with an empty list.
pub async fn list_staff(
    State(state): State<AppState>,
    AppPath(tenant_id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let staff = match state.store.list_staff(tenant_id).await {
        Ok(staff) => staff,
        Err(err @ StoreError::Core(CoreError::NotFound { .. })) => return Err(err.into()),
        Err(err) => {
            tracing::warn!(tenant_id, error = %err, "Staff roster unavailable, returning empty list");
            Vec::new()
        }
    };

    Ok(Json(DataResponse { data: staff }))
}
