//! Optimistic-concurrency and idempotency headers.
//!
//! Both headers are optional. A present but malformed value is rejected with
//! 400 rather than ignored, so a client never silently loses its guard.

use axum::extract::FromRequestParts;
use axum::http::header::IF_MATCH;
use axum::http::request::Parts;
use axum::http::HeaderName;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying a client-generated key for retry-safe block creation.
pub const IDEMPOTENCY_KEY: HeaderName = HeaderName::from_static("idempotency-key");

/// The configuration version a mutation was prepared against, from `If-Match`.
///
/// Accepts both `If-Match: 3` and the quoted entity-tag form `If-Match: "3"`.
///
/// ```ignore
/// async fn replace_hours(ExpectedVersion(version): ExpectedVersion) -> AppResult<Json<()>> {
///     // version is None when the client did not send If-Match
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedVersion(pub Option<i64>);

impl FromRequestParts<AppState> for ExpectedVersion {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(IF_MATCH) else {
            return Ok(ExpectedVersion(None));
        };
        let raw = value
            .to_str()
            .map_err(|_| AppError::BadRequest("If-Match header is not valid ASCII".into()))?;
        let version = raw
            .trim()
            .trim_start_matches("W/")
            .trim_matches('"')
            .parse::<i64>()
            .map_err(|_| {
                AppError::BadRequest(format!("If-Match must be a configuration version, got '{raw}'"))
            })?;
        Ok(ExpectedVersion(Some(version)))
    }
}

/// Client-supplied `Idempotency-Key` for block creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdempotencyKey(pub Option<Uuid>);

impl FromRequestParts<AppState> for IdempotencyKey {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(&IDEMPOTENCY_KEY) else {
            return Ok(IdempotencyKey(None));
        };
        let key = value
            .to_str()
            .ok()
            .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
            .ok_or_else(|| AppError::BadRequest("Idempotency-Key must be a UUID".into()))?;
        Ok(IdempotencyKey(Some(key)))
    }
}
