//! Integration tests for GET /processed/{name}

mod common;

use axum::http::StatusCode;
use common::{assert_error, assert_png, assert_status, TestApp};

#[tokio::test]
async fn test_unknown_image_is_not_found() {
    let app = TestApp::new();

    let response = app.get("/processed/cartoon_19700101000000_deadbeef.png").await;
    assert_error(&response, StatusCode::NOT_FOUND, "Not found");
}

#[tokio::test]
async fn test_existing_file_is_served_immutable() {
    let app = TestApp::new();
    let png = common::fixtures::scene_png(16, 16);
    std::fs::write(app.output_dir().join("cartoon_manual.png"), &png).unwrap();

    let response = app.get("/processed/cartoon_manual.png").await;
    assert_png(&response);
    assert_eq!(response.bytes(), png.as_slice());

    let cache_control = response
        .headers
        .get("cache-control")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(cache_control.contains("immutable"), "{cache_control}");
}

#[tokio::test]
async fn test_partial_files_are_never_served() {
    let app = TestApp::new();
    std::fs::write(app.output_dir().join("cartoon_x.png.partial"), b"half").unwrap();

    let response = app.get("/processed/cartoon_x.png.partial").await;
    assert_status(&response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_traversal_is_rejected() {
    let app = TestApp::new();
    // A PNG one level above the output directory
    let outside = app.output_dir().parent().unwrap().join("secret.png");
    std::fs::write(&outside, b"secret").unwrap();

    for path in [
        "/processed/..%2Fsecret.png",
        "/processed/%2E%2E%2Fsecret.png",
        "/processed/..%5Csecret.png",
    ] {
        let response = app.get(path).await;
        assert_status(&response, StatusCode::NOT_FOUND);
    }
}
