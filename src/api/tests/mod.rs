use super::*;
use crate::config::{ChunkingConfig, Config};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::io::{Cursor, Write};
use tower::ServiceExt;

mod upload;

/// Boundary used by the hand-built multipart bodies below
const BOUNDARY: &str = "docstream-test-boundary-7MA4YWxkTrZu0gW";

/// Helper to create a router plus the processor behind it
fn create_test_app(config: Config) -> (Router, Arc<ExportProcessor>) {
    let processor =
        Arc::new(ExportProcessor::new(config.clone()).expect("test config must validate"));
    let app = create_router(processor.clone(), Arc::new(config));
    (app, processor)
}

/// Config tuned for fast tests: no pacing surprises, small chunks available
fn test_config() -> Config {
    Config {
        chunking: ChunkingConfig {
            pacing_threshold: 10_000,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Build an in-memory ZIP with the given (name, content) members, in order
fn build_zip(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for (name, content) in files {
        if name.ends_with('/') {
            writer
                .add_directory(name.trim_end_matches('/'), options)
                .unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}

/// Minimal HTML page with a title element
fn page(title: &str) -> Vec<u8> {
    format!("<html><head><title>{title}</title></head><body><p>{title} body</p></body></html>")
        .into_bytes()
}

/// Build a multipart/form-data POST /upload request by hand
fn upload_request(field_name: &str, content_type: Option<&str>, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field_name}\"; filename=\"export.zip\"\r\n")
            .as_bytes(),
    );
    if let Some(content_type) = content_type {
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
    }
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Read a whole NDJSON response body into parsed event values
async fn read_events(body: Body) -> Vec<serde_json::Value> {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).expect("each line must be valid JSON"))
        .collect()
}

/// Event discriminants in order of appearance
fn kinds(events: &[serde_json::Value]) -> Vec<String> {
    events
        .iter()
        .map(|e| e["type"].as_str().unwrap_or("?").to_string())
        .collect()
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _processor) = create_test_app(test_config());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_root_reports_endpoint_map() {
    let (app, _processor) = create_test_app(test_config());

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["message"], "docstream API");
    assert!(json["endpoints"]["/upload"].is_string());
    assert!(json["endpoints"]["/abort"].is_string());
}

#[tokio::test]
async fn test_cors_enabled() {
    let mut config = test_config();
    config.server.cors_enabled = true;
    config.server.cors_origins = vec!["*".to_string()];
    let (app, _processor) = create_test_app(config);

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin"),
        "CORS header should be present when CORS is enabled"
    );
}

#[tokio::test]
async fn test_cors_restricted_to_configured_origins() {
    let mut config = test_config();
    config.server.cors_enabled = true;
    config.server.cors_origins = vec!["http://localhost:5173".to_string()];
    let (app, _processor) = create_test_app(config);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("Origin", "http://localhost:5173")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:5173")
    );
}

#[tokio::test]
async fn test_openapi_json_endpoint() {
    let (app, _processor) = create_test_app(test_config());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert!(json.get("openapi").is_some(), "Should have 'openapi' field");
    let version = json["openapi"].as_str().unwrap();
    assert!(version.starts_with("3."), "Should be OpenAPI 3.x");
    assert_eq!(json["info"]["title"], "docstream REST API");
    assert!(json["paths"]["/upload"]["post"].is_object());
}

#[tokio::test]
async fn test_swagger_ui_disabled() {
    let mut config = test_config();
    config.server.swagger_ui = false;
    let (app, _processor) = create_test_app(config);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/swagger-ui/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.status(),
        StatusCode::NOT_FOUND,
        "Swagger UI should not be accessible when disabled"
    );
}
