//! Assertion helpers for tests.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use super::app::TestResponse;

/// Assert response has expected status code
pub fn assert_status(response: &TestResponse, expected: StatusCode) {
    assert_eq!(
        response.status, expected,
        "Expected status {}, got {}. Body: {}",
        expected,
        response.status,
        response.text()
    );
}

/// Assert response is OK (200)
pub fn assert_ok(response: &TestResponse) {
    assert_status(response, StatusCode::OK);
}

/// Assert response is a valid PNG image
pub fn assert_png(response: &TestResponse) {
    assert_ok(response);
    assert!(
        response.is_png(),
        "Expected PNG image, got {} bytes starting with {:?}",
        response.body.len(),
        &response.body[..8.min(response.body.len())]
    );

    // Check Content-Type header
    let content_type = response
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok());
    assert_eq!(
        content_type,
        Some("image/png"),
        "Expected Content-Type: image/png"
    );
}

/// Assert JSON response has expected status field
pub fn assert_json_status(response: &TestResponse, expected_status: u16) {
    let json: serde_json::Value = response.json();
    assert_eq!(
        json["status"].as_u64(),
        Some(expected_status as u64),
        "Expected JSON status {}, got {:?}. Full response: {}",
        expected_status,
        json["status"],
        serde_json::to_string_pretty(&json).unwrap()
    );
}

/// Assert an error response: HTTP status, matching JSON status and message
pub fn assert_error(response: &TestResponse, expected: StatusCode, message: &str) {
    assert_status(response, expected);
    assert_json_status(response, expected.as_u16());
    let json: serde_json::Value = response.json();
    assert_eq!(json["error"], message);
}

/// Assert a successful cartoonify response and return the image URL
pub fn assert_valid_cartoonify_response(response: &TestResponse) -> String {
    assert_ok(response);
    assert_json_status(response, 200);
    let json: serde_json::Value = response.json();

    let url = json["cartoon_image_url"]
        .as_str()
        .expect("Expected cartoon_image_url to be a string");
    assert!(
        url.starts_with("/processed/cartoon_") && url.ends_with(".png"),
        "Unexpected image URL: {url}"
    );
    assert!(json["width"].is_u64(), "Expected width");
    assert!(json["height"].is_u64(), "Expected height");
    assert!(json["palette"].is_array(), "Expected palette");

    let edges = json["edges"].as_str().unwrap_or_default();
    assert!(
        edges == "inked" || edges == "blank",
        "Unexpected edges value: {edges}"
    );

    url.to_string()
}
