//! Integration tests for the schedule configuration endpoints.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use common::{
    body_json, build_test_app, delete, get, json_request, patch_json, post_json, put_json, send,
    OTHER_TENANT, TENANT,
};

fn config_uri(tenant_id: i64) -> String {
    format!("/api/v1/tenants/{tenant_id}/schedule-config")
}

fn default_hours() -> Value {
    json!([
        { "weekday": 0, "opens_at": "08:00", "closes_at": "12:00", "is_active": false },
        { "weekday": 1, "opens_at": "08:00", "closes_at": "18:00", "is_active": true },
        { "weekday": 2, "opens_at": "08:00", "closes_at": "18:00", "is_active": true },
        { "weekday": 3, "opens_at": "08:00", "closes_at": "18:00", "is_active": true },
        { "weekday": 4, "opens_at": "08:00", "closes_at": "18:00", "is_active": true },
        { "weekday": 5, "opens_at": "08:00", "closes_at": "18:00", "is_active": true },
        { "weekday": 6, "opens_at": "08:00", "closes_at": "14:00", "is_active": true },
    ])
}

fn vacation_block() -> Value {
    json!({
        "title": "Férias do Rafael",
        "start_date": "2024-07-01",
        "end_date": "2024-07-05",
        "staff_ids": [1],
        "category": "vacation",
    })
}

// ---------------------------------------------------------------------------
// GET /tenants/{id}/schedule-config
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_seeds_defaults_for_known_tenant() {
    let app = build_test_app().await;
    let response = get(app, &config_uri(TENANT)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("etag").unwrap(), "\"1\"");

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["tenant_id"], TENANT);
    assert_eq!(data["version"], 1);
    assert_eq!(data["operating_hours"], default_hours());
    assert_eq!(data["work_breaks"][0]["name"], "Almoço");
    assert_eq!(data["work_breaks"][0]["weekdays"], json!([1, 2, 3, 4, 5]));
    assert_eq!(data["booking_policy"]["slot_granularity_minutes"], 30);
    assert_eq!(data["blocks"], json!([]));
}

#[tokio::test]
async fn get_unknown_tenant_returns_404() {
    let app = build_test_app().await;
    let response = get(app, &config_uri(999)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn repeated_gets_are_identical() {
    let app = build_test_app().await;
    let first = body_json(get(app.clone(), &config_uri(TENANT)).await).await;
    let second = body_json(get(app, &config_uri(TENANT)).await).await;
    assert_eq!(first, second);
}

// ---------------------------------------------------------------------------
// PUT /tenants/{id}/schedule-config/hours
// ---------------------------------------------------------------------------

#[tokio::test]
async fn replace_hours_returns_updated_aggregate() {
    let app = build_test_app().await;
    let mut hours = default_hours();
    hours[1]["opens_at"] = json!("09:00");

    let response = put_json(app.clone(), &format!("{}/hours", config_uri(TENANT)), hours.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("etag").unwrap(), "\"2\"");

    let json = body_json(get(app, &config_uri(TENANT)).await).await;
    assert_eq!(json["data"]["operating_hours"], hours);
    assert_eq!(json["data"]["version"], 2);
}

#[tokio::test]
async fn replace_hours_rejects_inverted_window_with_weekday_in_message() {
    let app = build_test_app().await;
    let mut hours = default_hours();
    hours[1]["opens_at"] = json!("18:00");
    hours[1]["closes_at"] = json!("08:00");

    let response = put_json(app.clone(), &format!("{}/hours", config_uri(TENANT)), hours).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("Monday"));

    let json = body_json(get(app, &config_uri(TENANT)).await).await;
    assert_eq!(json["data"]["operating_hours"], default_hours());
}

#[tokio::test]
async fn replace_hours_rejects_six_entries() {
    let app = build_test_app().await;
    let mut hours = default_hours();
    hours.as_array_mut().unwrap().pop();

    let response = put_json(app, &format!("{}/hours", config_uri(TENANT)), hours).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_time_is_rejected() {
    let app = build_test_app().await;
    let mut hours = default_hours();
    hours[2]["closes_at"] = json!("25:00");

    let response = put_json(app, &format!("{}/hours", config_uri(TENANT)), hours).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn unparseable_body_uses_error_envelope() {
    let app = build_test_app().await;
    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri(format!("{}/blocks", config_uri(TENANT)))
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{\"title\": "))
        .unwrap();

    let response = send(app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn non_numeric_block_id_returns_400() {
    let app = build_test_app().await;
    let response = delete(app, "/api/v1/schedule-config/blocks/abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// If-Match
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stale_if_match_returns_409() {
    let app = build_test_app().await;
    let uri = format!("{}/hours", config_uri(TENANT));

    let fresh = json_request(Method::PUT, &uri, &default_hours(), &[("if-match", "\"1\"")]);
    assert_eq!(send(app.clone(), fresh).await.status(), StatusCode::OK);

    let stale = json_request(Method::PUT, &uri, &default_hours(), &[("if-match", "1")]);
    let response = send(app, stale).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[tokio::test]
async fn malformed_if_match_returns_400() {
    let app = build_test_app().await;
    let uri = format!("{}/hours", config_uri(TENANT));
    let request = json_request(Method::PUT, &uri, &default_hours(), &[("if-match", "latest")]);

    let response = send(app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

// ---------------------------------------------------------------------------
// PUT breaks / policy
// ---------------------------------------------------------------------------

#[tokio::test]
async fn replace_breaks_assigns_ids_and_keeps_existing() {
    let app = build_test_app().await;
    let breaks = json!([
        { "id": 1, "name": "Almoço", "start_time": "12:00", "end_time": "13:00", "weekdays": [1, 2, 3, 4, 5] },
        { "name": "Café", "start_time": "15:00", "end_time": "15:15", "weekdays": [6] },
    ]);

    let response = put_json(app, &format!("{}/breaks", config_uri(TENANT)), breaks).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let breaks = json["data"]["work_breaks"].as_array().unwrap();
    assert_eq!(breaks.len(), 2);
    assert_eq!(breaks[0]["id"], 1);
    assert_eq!(breaks[1]["id"], 2);
    assert_eq!(breaks[1]["is_active"], true);
}

#[tokio::test]
async fn active_break_without_weekdays_returns_400() {
    let app = build_test_app().await;
    let breaks = json!([
        { "name": "Almoço", "start_time": "12:00", "end_time": "13:00", "weekdays": [] },
    ]);

    let response = put_json(app, &format!("{}/breaks", config_uri(TENANT)), breaks).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn replace_policy_round_trips() {
    let app = build_test_app().await;
    let policy = json!({
        "min_lead_hours": 1,
        "max_lead_days": 60,
        "slot_granularity_minutes": 15,
        "allow_saturday": true,
        "allow_sunday": true,
        "allow_holiday": false,
        "cancel_lead_hours": 12,
        "reschedule_lead_hours": 6,
    });

    let response = put_json(app, &format!("{}/policy", config_uri(TENANT)), policy.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["booking_policy"], policy);
}

#[tokio::test]
async fn zero_granularity_policy_returns_400() {
    let app = build_test_app().await;
    let policy = json!({
        "min_lead_hours": 2,
        "max_lead_days": 30,
        "slot_granularity_minutes": 0,
        "allow_saturday": true,
        "allow_sunday": false,
        "allow_holiday": false,
        "cancel_lead_hours": 24,
        "reschedule_lead_hours": 12,
    });

    let response = put_json(app, &format!("{}/policy", config_uri(TENANT)), policy).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_block_returns_201_with_active_block() {
    let app = build_test_app().await;
    let response = post_json(app.clone(), &format!("{}/blocks", config_uri(TENANT)), vacation_block()).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["is_active"], true);
    assert_eq!(json["data"]["category"], "vacation");
    assert_eq!(json["data"]["start_time"], Value::Null);

    let config = body_json(get(app, &config_uri(TENANT)).await).await;
    assert_eq!(config["data"]["blocks"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn create_block_with_inverted_dates_returns_400() {
    let app = build_test_app().await;
    let mut block = vacation_block();
    block["start_date"] = json!("2024-07-10");

    let response = post_json(app, &format!("{}/blocks", config_uri(TENANT)), block).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_block_with_only_start_time_returns_400() {
    let app = build_test_app().await;
    let mut block = vacation_block();
    block["start_time"] = json!("09:00");

    let response = post_json(app, &format!("{}/blocks", config_uri(TENANT)), block).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn idempotency_key_replays_first_creation() {
    let app = build_test_app().await;
    let uri = format!("{}/blocks", config_uri(TENANT));
    let key = ("idempotency-key", "6f1c1a52-8f0e-4a8e-9a53-2a3f7c1d9b10");

    let first = send(app.clone(), json_request(Method::POST, &uri, &vacation_block(), &[key])).await;
    let second = send(app.clone(), json_request(Method::POST, &uri, &vacation_block(), &[key])).await;
    let first = body_json(first).await;
    let second = body_json(second).await;
    assert_eq!(first["data"]["id"], second["data"]["id"]);

    let config = body_json(get(app, &config_uri(TENANT)).await).await;
    assert_eq!(config["data"]["blocks"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn non_uuid_idempotency_key_returns_400() {
    let app = build_test_app().await;
    let uri = format!("{}/blocks", config_uri(TENANT));
    let request = json_request(
        Method::POST,
        &uri,
        &vacation_block(),
        &[("idempotency-key", "retry-1")],
    );

    assert_eq!(send(app, request).await.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn patch_block_merges_fields() {
    let app = build_test_app().await;
    let created = body_json(
        post_json(app.clone(), &format!("{}/blocks", config_uri(TENANT)), vacation_block()).await,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let response = patch_json(
        app,
        &format!("/api/v1/schedule-config/blocks/{id}"),
        json!({ "end_date": "2024-07-12", "description": "Estendido", "is_active": false }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["end_date"], "2024-07-12");
    assert_eq!(json["data"]["start_date"], "2024-07-01");
    assert_eq!(json["data"]["description"], "Estendido");
    assert_eq!(json["data"]["is_active"], false);
    assert_eq!(json["data"]["created_at"], created["data"]["created_at"]);
}

#[tokio::test]
async fn patch_missing_block_returns_404() {
    let app = build_test_app().await;
    let response = patch_json(app, "/api/v1/schedule-config/blocks/404", json!({ "title": "x" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_block_returns_204_then_404() {
    let app = build_test_app().await;
    let created = body_json(
        post_json(app.clone(), &format!("{}/blocks", config_uri(TENANT)), vacation_block()).await,
    )
    .await;
    let uri = format!("/api/v1/schedule-config/blocks/{}", created["data"]["id"]);

    assert_eq!(delete(app.clone(), &uri).await.status(), StatusCode::NO_CONTENT);
    assert_eq!(delete(app, &uri).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blocks_are_scoped_to_their_tenant() {
    let app = build_test_app().await;
    post_json(app.clone(), &format!("{}/blocks", config_uri(TENANT)), vacation_block()).await;

    let other = body_json(get(app, &config_uri(OTHER_TENANT)).await).await;
    assert_eq!(other["data"]["blocks"], json!([]));
}

// ---------------------------------------------------------------------------
// GET /tenants/{id}/staff
// ---------------------------------------------------------------------------

#[tokio::test]
async fn staff_listed_by_name() {
    let app = build_test_app().await;
    let response = get(app, &format!("/api/v1/tenants/{TENANT}/staff")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let names: Vec<_> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Bruno", "Rafael"]);
}

#[tokio::test]
async fn staff_for_unknown_tenant_returns_404() {
    let app = build_test_app().await;
    let response = get(app, "/api/v1/tenants/999/staff").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
