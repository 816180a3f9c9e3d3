//! Integration tests for POST /api/cartoonify

mod common;

use axum::http::StatusCode;
use common::fixtures::{scene_jpeg, scene_png, Part, FAST_PARAMS};
use common::{assert_error, assert_png, assert_status, assert_valid_cartoonify_response, TestApp};
use cartoonify::models::AppConfig;

fn with_fast(extra: &[(&'static str, &'static str)]) -> Vec<(&'static str, &'static str)> {
    let mut params: Vec<_> = FAST_PARAMS
        .iter()
        .filter(|(name, _)| !extra.iter().any(|(n, _)| n == name))
        .copied()
        .collect();
    params.extend_from_slice(extra);
    params
}

#[tokio::test]
async fn test_small_png_is_upscaled_and_served() {
    let app = TestApp::new();

    let response = app
        .cartoonify("photo.png", scene_png(300, 200), FAST_PARAMS)
        .await;
    let url = assert_valid_cartoonify_response(&response);

    let json: serde_json::Value = response.json();
    assert_eq!(json["width"], 512);
    assert_eq!(json["height"], 341);

    // Exactly one finished file, no leftovers
    let files = app.output_files();
    assert_eq!(files.len(), 1);
    assert_eq!(format!("/processed/{}", files[0]), url);

    let image = app.get(&url).await;
    assert_png(&image);
    let decoded = image::load_from_memory(image.bytes()).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (512, 341));
}

#[tokio::test]
async fn test_upload_route_shares_the_handler() {
    let app = TestApp::new();

    let mut parts = vec![Part::file("file", "photo.png", scene_png(320, 320))];
    parts.extend(FAST_PARAMS.iter().map(|(name, value)| Part::text(name, value)));
    let response = app.post_multipart("/upload", &parts).await;
    let url = assert_valid_cartoonify_response(&response);

    assert_png(&app.get(&url).await);
    assert_eq!(app.output_files().len(), 1);
}

#[tokio::test]
async fn test_jpeg_without_upscale_keeps_size() {
    let app = TestApp::new();

    let params = with_fast(&[("upscale_small", "no")]);
    let response = app
        .cartoonify("PHOTO.JPG", scene_jpeg(600, 400), &params)
        .await;
    assert_valid_cartoonify_response(&response);

    let json: serde_json::Value = response.json();
    assert_eq!(json["width"], 600);
    assert_eq!(json["height"], 400);
}

#[tokio::test]
async fn test_palette_respects_num_colors() {
    let app = TestApp::new();

    let params = with_fast(&[("num_colors", "4")]);
    let response = app
        .cartoonify("photo.png", scene_png(600, 520), &params)
        .await;
    assert_valid_cartoonify_response(&response);

    let json: serde_json::Value = response.json();
    let palette = json["palette"].as_array().unwrap();
    assert!(palette.len() <= 4, "palette too large: {palette:?}");
    assert!(json["palette_size"].as_u64().unwrap() <= 4);
}

#[tokio::test]
async fn test_malformed_params_fall_back_to_defaults() {
    let app = TestApp::new();

    let params = with_fast(&[
        ("num_colors", "abc"),
        ("line_strength", "bold"),
        ("upscale_small", "perhaps"),
        ("seed", "not-a-number"),
        ("unrelated", "ignored"),
    ]);
    let response = app
        .cartoonify("photo.png", scene_png(600, 520), &params)
        .await;
    assert_valid_cartoonify_response(&response);

    let json: serde_json::Value = response.json();
    assert!(json["palette_size"].as_u64().unwrap() <= 8);
}

#[tokio::test]
async fn test_concurrent_uploads_get_distinct_files() {
    let app = TestApp::new();

    let (a, b) = tokio::join!(
        app.cartoonify("a.png", scene_png(320, 320), FAST_PARAMS),
        app.cartoonify("b.png", scene_png(320, 320), FAST_PARAMS),
    );
    let url_a = assert_valid_cartoonify_response(&a);
    let url_b = assert_valid_cartoonify_response(&b);

    assert_ne!(url_a, url_b);
    assert_eq!(app.output_files().len(), 2);
}

#[tokio::test]
async fn test_missing_file_part() {
    let app = TestApp::new();

    let response = app
        .post_multipart("/api/cartoonify", &[Part::text("num_colors", "6")])
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, "No file part");
}

#[tokio::test]
async fn test_empty_file_name() {
    let app = TestApp::new();

    let response = app.cartoonify("", scene_png(64, 64), &[]).await;
    assert_error(&response, StatusCode::BAD_REQUEST, "No selected file");
}

#[tokio::test]
async fn test_unsupported_extension() {
    let app = TestApp::new();

    let response = app.cartoonify("notes.txt", b"hello".to_vec(), &[]).await;
    assert_error(
        &response,
        StatusCode::BAD_REQUEST,
        "Invalid file type: notes.txt",
    );
    assert!(app.output_files().is_empty());
}

#[tokio::test]
async fn test_corrupt_image_is_client_error() {
    let app = TestApp::new();

    let response = app
        .cartoonify("photo.png", b"\x89PNG\r\n\x1a\nthen garbage".to_vec(), &[])
        .await;
    assert_status(&response, StatusCode::BAD_REQUEST);

    let json: serde_json::Value = response.json();
    assert_eq!(json["status"], 400);
    assert!(json["error"].as_str().unwrap().starts_with("Invalid image:"));
    assert!(app.output_files().is_empty());
}

#[tokio::test]
async fn test_not_multipart_is_bad_request() {
    let app = TestApp::new();

    let response = app
        .post("/api/cartoonify", "application/json", b"{}".to_vec())
        .await;
    assert_status(&response, StatusCode::BAD_REQUEST);
    let json: serde_json::Value = response.json();
    assert_eq!(json["status"], 400);
}

#[tokio::test]
async fn test_upload_over_configured_limit() {
    let app = TestApp::with_config(AppConfig {
        max_upload_bytes: 1024,
        ..AppConfig::default()
    });

    let response = app
        .cartoonify("photo.png", vec![0u8; 4096], FAST_PARAMS)
        .await;
    assert_error(
        &response,
        StatusCode::PAYLOAD_TOO_LARGE,
        "Upload exceeds the 1024 byte limit",
    );
}

#[tokio::test]
async fn test_body_over_transport_limit() {
    let app = TestApp::with_config(AppConfig {
        max_upload_bytes: 1024,
        ..AppConfig::default()
    });

    // Larger than the limit plus form overhead
    let response = app
        .cartoonify("photo.png", vec![0u8; 256 * 1024], &[])
        .await;
    assert_status(&response, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(app.output_files().is_empty());
}
