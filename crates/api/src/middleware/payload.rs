//! Body, query and path extractors whose rejections use the `{error, code}`
//! envelope.
//!
//! axum's stock extractors answer malformed input with a plain-text body
//! (and 422 for JSON that parses but does not deserialize). These wrappers
//! route every rejection through [`AppError`], so a bad `HH:mm` or date is a
//! `400 VALIDATION_ERROR` like any other domain validation failure.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Query-string parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

/// Path parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);
