//! Integration tests for the bug report JSON API.
//!
//! Every test runs the full router over an in-memory blob backend so the
//! blobs written by a request can be inspected directly.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use bug_report_storage::BlobBackend;
use chrono::Utc;
use common::{body_json, build_test_app, get, post_form, sample_report, valid_form, MultipartForm};
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Submit `form` and return the generated report id.
async fn submit_ok(app: axum::Router, form: MultipartForm) -> String {
    let response = post_form(app, "/api/reports", form).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    json["reportId"].as_str().unwrap().to_string()
}

/// Fetch a report through the API as JSON.
async fn fetch(app: axum::Router, id: &str) -> serde_json::Value {
    let response = get(app, &format!("/api/reports/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Test: valid submission is persisted and retrievable
// ---------------------------------------------------------------------------

#[tokio::test]
async fn valid_submission_returns_id_and_round_trips() {
    let (app, backend) = build_test_app();

    let form = valid_form()
        .text("stepsToReproduce", "1. Add item\n2. Tap Pay")
        .text("traceId", "trace-123")
        .text("userInfo", r#"{"userId":"u-9","email":"sam@example.com"}"#);
    let id = submit_ok(app.clone(), form).await;

    assert!(id.starts_with("br_"), "id should carry the br_ prefix: {id}");
    assert_eq!(id.len(), "br_".len() + 36);

    let report = fetch(app, &id).await;
    assert_eq!(report["id"], id.as_str());
    assert_eq!(report["title"], "Checkout crashes");
    assert_eq!(report["description"], "The app closes when tapping Pay");
    assert_eq!(report["currentRoute"], "/checkout");
    assert_eq!(report["stepsToReproduce"], "1. Add item\n2. Tap Pay");
    assert_eq!(report["traceId"], "trace-123");
    assert_eq!(report["timestamp"], "2024-01-20T10:00:00Z");
    assert_eq!(
        report["navigationHistory"],
        serde_json::json!(["/home", "/cart", "/checkout"])
    );
    assert_eq!(report["deviceInfo"]["platform"], "ios");
    assert_eq!(report["deviceInfo"]["deviceModel"], "iPhone15,2");
    assert_eq!(report["userInfo"]["userId"], "u-9");
    assert!(report.get("screenshotUrl").is_none());

    // Metadata and logs are written as two separate blobs.
    assert!(backend.raw(&format!("{id}/metadata.json")).await.is_some());
    assert!(backend.raw(&format!("{id}/logs.json")).await.is_some());
    assert_eq!(backend.len().await, 2);
}

// ---------------------------------------------------------------------------
// Test: blank required fields are rejected before any write
// ---------------------------------------------------------------------------

#[tokio::test]
async fn blank_required_field_returns_400_without_writes() {
    for field in ["title", "description", "currentRoute"] {
        let (app, backend) = build_test_app();

        let mut form = common::MultipartForm::new();
        for (name, value) in [
            ("title", "Crash"),
            ("description", "It crashed"),
            ("currentRoute", "/home"),
        ] {
            form = form.text(name, if name == field { "" } else { value });
        }
        let form = form
            .text("navigationHistory", "[]")
            .text("deviceInfo", common::DEVICE_INFO_JSON);

        let response = post_form(app, "/api/reports", form).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "field {field}");

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert!(json["error"].as_str().unwrap().contains(field));
        assert!(backend.is_empty().await, "no blob may be written");
    }
}

#[tokio::test]
async fn whitespace_only_title_is_accepted() {
    let (app, _) = build_test_app();
    let form = MultipartForm::new()
        .text("title", "   ")
        .text("description", "It crashed")
        .text("currentRoute", "/home")
        .text("navigationHistory", "[]")
        .text("deviceInfo", common::DEVICE_INFO_JSON);

    let id = submit_ok(app.clone(), form).await;
    assert_eq!(fetch(app, &id).await["title"], "   ");
}

#[tokio::test]
async fn invalid_navigation_history_returns_400() {
    let (app, backend) = build_test_app();
    let form = MultipartForm::new()
        .text("title", "Crash")
        .text("description", "It crashed")
        .text("currentRoute", "/home")
        .text("navigationHistory", "/home,/cart")
        .text("deviceInfo", common::DEVICE_INFO_JSON);

    let response = post_form(app, "/api/reports", form).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(backend.is_empty().await);
}

#[tokio::test]
async fn invalid_device_info_returns_400() {
    let (app, backend) = build_test_app();
    let form = MultipartForm::new()
        .text("title", "Crash")
        .text("description", "It crashed")
        .text("currentRoute", "/home")
        .text("navigationHistory", "[]")
        .text("deviceInfo", "{\"platform\":");

    let response = post_form(app, "/api/reports", form).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("deviceInfo"));
    assert!(backend.is_empty().await);
}

#[tokio::test]
async fn non_multipart_body_returns_400() {
    let (app, _) = build_test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/reports")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"title":"x"}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

// ---------------------------------------------------------------------------
// Test: logs parsing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn raw_text_logs_become_single_info_entry() {
    let (app, _) = build_test_app();
    let id = submit_ok(app.clone(), valid_form().text("logs", "this is not json")).await;

    let report = fetch(app, &id).await;
    let logs = report["logs"].as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["level"], "info");
    assert_eq!(logs[0]["message"], "this is not json");
}

#[tokio::test]
async fn json_logs_are_preserved_in_order() {
    let (app, backend) = build_test_app();
    let logs = r#"[
        {"level":"debug","message":"one","timestamp":"2024-01-20T09:59:00Z"},
        {"level":"warn","message":"two","timestamp":"2024-01-20T09:59:30Z","context":{"attempt":2}},
        {"level":"error","message":"three","timestamp":"2024-01-20T10:00:00Z"}
    ]"#;
    let id = submit_ok(app.clone(), valid_form().text("logs", logs)).await;

    let report = fetch(app, &id).await;
    let stored = report["logs"].as_array().unwrap();
    let messages: Vec<_> = stored.iter().map(|l| l["message"].as_str().unwrap()).collect();
    assert_eq!(messages, ["one", "two", "three"]);
    assert_eq!(stored[1]["context"]["attempt"], 2);

    // The logs blob holds the same sequence on its own.
    let blob = backend.raw(&format!("{id}/logs.json")).await.unwrap();
    let blob: serde_json::Value = serde_json::from_slice(&blob).unwrap();
    assert_eq!(blob.as_array().unwrap().len(), 3);
    assert_eq!(blob[2]["message"], "three");
}

// ---------------------------------------------------------------------------
// Test: timestamp fallback
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unparseable_timestamp_uses_server_time() {
    let (app, _) = build_test_app();
    let form = MultipartForm::new()
        .text("title", "Crash")
        .text("description", "It crashed")
        .text("currentRoute", "/home")
        .text("navigationHistory", "[]")
        .text("deviceInfo", common::DEVICE_INFO_JSON)
        .text("timestamp", "last tuesday");

    let before = Utc::now();
    let id = submit_ok(app.clone(), form).await;
    let after = Utc::now();

    let report = fetch(app, &id).await;
    let ts: chrono::DateTime<Utc> = report["timestamp"].as_str().unwrap().parse().unwrap();
    assert!(ts >= before && ts <= after, "timestamp {ts} outside [{before}, {after}]");
}

// ---------------------------------------------------------------------------
// Test: screenshots
// ---------------------------------------------------------------------------

#[tokio::test]
async fn screenshot_is_uploaded_and_linked() {
    let (app, backend) = build_test_app();
    let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    let form = valid_form().file("screenshot", "screen.png", "image/png", &png);
    let id = submit_ok(app.clone(), form).await;

    let report = fetch(app, &id).await;
    assert_eq!(
        report["screenshotUrl"],
        format!("memory://bug-reports/{id}/screenshot.png")
    );
    assert_eq!(
        backend.raw(&format!("{id}/screenshot.png")).await.unwrap(),
        png.to_vec()
    );
}

#[tokio::test]
async fn screenshot_text_field_is_not_uploaded() {
    let (app, backend) = build_test_app();
    let form = valid_form().text("screenshot", "not a file");
    let id = submit_ok(app.clone(), form).await;

    let report = fetch(app, &id).await;
    assert!(report.get("screenshotUrl").is_none());
    assert!(backend.raw(&format!("{id}/screenshot.png")).await.is_none());
    assert_eq!(backend.len().await, 2);
}

#[tokio::test]
async fn screenshot_upload_failure_is_not_fatal() {
    let (app, backend) = build_test_app();
    backend.fail_writes_ending_with("/screenshot.png").await;

    let form = valid_form().file("screenshot", "screen.png", "image/png", b"png-bytes");
    let id = submit_ok(app.clone(), form).await;

    let report = fetch(app, &id).await;
    assert!(report.get("screenshotUrl").is_none());
}

// ---------------------------------------------------------------------------
// Test: persistence failure
// ---------------------------------------------------------------------------

#[tokio::test]
async fn persistence_failure_returns_500_without_id() {
    let (app, backend) = build_test_app();
    backend.fail_writes_ending_with("/metadata.json").await;

    let response = post_form(app, "/api/reports", valid_form()).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "PERSISTENCE_ERROR");
    assert!(json.get("reportId").is_none());
}

#[tokio::test]
async fn failed_logs_write_is_a_persistence_failure() {
    let (app, backend) = build_test_app();
    backend.fail_writes_ending_with("/logs.json").await;

    let response = post_form(app, "/api/reports", valid_form()).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// ---------------------------------------------------------------------------
// Test: fetching and listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_report_returns_404() {
    let (app, _) = build_test_app();
    let response = get(app, "/api/reports/br_does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn list_is_sorted_newest_first() {
    let (app, backend) = build_test_app();
    let store = bug_report_storage::ReportStore::new(backend.clone());

    // Ids chosen so enumeration order differs from timestamp order.
    store.save(&sample_report("br_a", "2024-01-01T00:00:00Z")).await.unwrap();
    store.save(&sample_report("br_b", "2024-03-01T00:00:00Z")).await.unwrap();
    store.save(&sample_report("br_c", "2024-02-01T00:00:00Z")).await.unwrap();

    let response = get(app, "/api/reports").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["count"], 3);
    let ids: Vec<_> = json["reports"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, ["br_b", "br_c", "br_a"]);
}

#[tokio::test]
async fn list_skips_corrupted_report() {
    let (app, backend) = build_test_app();
    let store = bug_report_storage::ReportStore::new(backend.clone());

    store.save(&sample_report("br_a", "2024-01-01T00:00:00Z")).await.unwrap();
    store.save(&sample_report("br_b", "2024-01-02T00:00:00Z")).await.unwrap();
    backend
        .put("br_c/metadata.json", b"{\"id\":".to_vec(), "application/json")
        .await
        .unwrap();

    let json = body_json(get(app, "/api/reports").await).await;
    assert_eq!(json["count"], 2);
    let ids: Vec<_> = json["reports"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["br_b", "br_a"]);
}

#[tokio::test]
async fn empty_store_lists_nothing() {
    let (app, _) = build_test_app();
    let json = body_json(get(app, "/api/reports").await).await;
    assert_eq!(json["count"], 0);
    assert_eq!(json["reports"], serde_json::json!([]));
}

// ---------------------------------------------------------------------------
// Test: log-only mode
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submission_without_storage_still_succeeds() {
    let app = common::build_app_without_storage();
    let form = valid_form().file("screenshot", "s.png", "image/png", b"ignored");

    let response = post_form(app, "/api/reports", form).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert!(json["reportId"].as_str().unwrap().starts_with("br_"));
}

#[tokio::test]
async fn reads_without_storage_return_503() {
    let app = common::build_app_without_storage();

    let response = get(app.clone(), "/api/reports").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["code"], "STORAGE_UNAVAILABLE");

    let response = get(app, "/api/reports/br_1").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
