#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use barbershop_api::config::{LogFormat, ServerConfig};
use barbershop_api::router::build_app_router;
use barbershop_api::state::AppState;
use barbershop_db::InMemoryStore;

pub const TENANT: i64 = 1;
pub const OTHER_TENANT: i64 = 2;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        database_url: None,
        log_format: LogFormat::Pretty,
        shop_utc_offset_minutes: 0,
    }
}

/// Two tenants; the first has a roster of two.
pub async fn test_store() -> InMemoryStore {
    let store = InMemoryStore::new();
    store.add_tenant(TENANT).await;
    store.add_tenant(OTHER_TENANT).await;
    store.add_staff(TENANT, "Rafael").await.unwrap();
    store.add_staff(TENANT, "Bruno").await.unwrap();
    store
}

/// Build the full application router over the given store, with the same
/// middleware stack production uses.
pub fn build_app(store: InMemoryStore) -> Router {
    let config = test_config();
    let state = AppState {
        store: Arc::new(store),
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

pub async fn build_test_app() -> Router {
    build_app(test_store().await)
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub fn json_request(
    method: Method,
    uri: &str,
    body: &serde_json::Value,
    headers: &[(&str, &str)],
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, &body, &[])).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request(Method::PUT, uri, &body, &[])).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request(Method::PATCH, uri, &body, &[])).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
