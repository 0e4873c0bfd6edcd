#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use bug_report_api::config::ServerConfig;
use bug_report_api::router::build_app_router;
use bug_report_api::state::AppState;
use bug_report_core::report::{BugReport, DeviceInfo, LogEntry};
use bug_report_events::LogForwarder;
use bug_report_storage::{MemoryBackend, ReportStore};
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use tower::ServiceExt;

pub const CONTAINER: &str = "bug-reports";

pub const DEVICE_INFO_JSON: &str = r#"{"platform":"ios","os":"iOS","osVersion":"17.2","appVersion":"1.4.0","buildNumber":"42","deviceModel":"iPhone15,2"}"#;

/// Build a test `ServerConfig` with safe defaults and no collaborators.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["*".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: 8 * 1024 * 1024,
        storage_connection_string: None,
        container_name: CONTAINER.to_string(),
        logward_api_key: None,
        logward_ingest_url: "http://127.0.0.1:9/ingest".to_string(),
    }
}

/// Build the full application router around the given collaborators.
///
/// Uses the same `build_app_router` as `main.rs` so tests exercise the
/// production middleware stack.
pub fn build_app(store: Option<ReportStore>, forwarder: Option<Arc<LogForwarder>>) -> Router {
    let state = AppState {
        config: Arc::new(test_config()),
        store,
        forwarder,
    };
    build_app_router(state)
}

/// Router over an in-memory store, plus a handle to inspect the blobs.
pub fn build_test_app() -> (Router, Arc<MemoryBackend>) {
    let backend = Arc::new(MemoryBackend::new(CONTAINER));
    let store = ReportStore::new(backend.clone());
    (build_app(Some(store), None), backend)
}

/// Router in log-only mode (no storage configured).
pub fn build_app_without_storage() -> Router {
    build_app(None, None)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_form(app: Router, uri: &str, form: MultipartForm) -> Response<Body> {
    app.oneshot(form.into_request(uri)).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

// ---------------------------------------------------------------------------
// Multipart forms
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "----bug-report-test-boundary";

/// Hand-built `multipart/form-data` body.
#[derive(Default)]
pub struct MultipartForm {
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn into_request(mut self, uri: &str) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(self.body))
            .unwrap()
    }
}

/// A submission with every required field filled in.
pub fn valid_form() -> MultipartForm {
    MultipartForm::new()
        .text("title", "Checkout crashes")
        .text("description", "The app closes when tapping Pay")
        .text("currentRoute", "/checkout")
        .text("navigationHistory", r#"["/home","/cart","/checkout"]"#)
        .text("deviceInfo", DEVICE_INFO_JSON)
        .text("timestamp", "2024-01-20T10:00:00Z")
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A stored report with the given id and submission time.
pub fn sample_report(id: &str, timestamp: &str) -> BugReport {
    BugReport {
        id: id.to_string(),
        title: format!("Report {id}"),
        description: "Something broke".to_string(),
        steps_to_reproduce: None,
        current_route: "/home".to_string(),
        navigation_history: vec!["/home".to_string()],
        logs: vec![LogEntry {
            level: "error".to_string(),
            message: "boom".to_string(),
            timestamp: timestamp.to_string(),
            context: None,
        }],
        device_info: DeviceInfo {
            platform: "android".to_string(),
            os: "Android".to_string(),
            os_version: "14".to_string(),
            app_version: "2.0.0".to_string(),
            build_number: "7".to_string(),
            device_model: None,
            manufacturer: None,
        },
        user_info: None,
        timestamp: timestamp.parse::<DateTime<Utc>>().unwrap(),
        trace_id: None,
        screenshot_url: None,
    }
}
