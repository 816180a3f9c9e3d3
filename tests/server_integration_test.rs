//! Server integration tests that test the actual server behavior.
//!
//! These tests start a real TCP server and talk plain HTTP/1.1 to it.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use cartoonify::models::AppConfig;
use cartoonify::server::{build_router, create_app_state};

/// Start a test server on an available port and return the port number.
async fn start_test_server(output_dir: &std::path::Path) -> u16 {
    let config = AppConfig::default().with_output_dir(output_dir);
    let state = create_app_state(config).expect("Failed to create app state");
    let app = build_router(state);

    // Bind to port 0 to get an available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let port = listener.local_addr().unwrap().port();

    // Spawn the server in the background
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    port
}

/// Send one GET request and return the full raw response.
async fn raw_get(port: u16, path: &str) -> String {
    let mut stream = TcpStream::connect(format!("127.0.0.1:{port}"))
        .await
        .expect("Failed to connect");

    let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    stream
        .write_all(request.as_bytes())
        .await
        .expect("Failed to write request");

    let mut response = Vec::new();
    tokio::time::timeout(
        tokio::time::Duration::from_secs(5),
        stream.read_to_end(&mut response),
    )
    .await
    .expect("Timed out reading response")
    .expect("Failed to read response");

    String::from_utf8_lossy(&response).into_owned()
}

#[tokio::test]
async fn test_health_over_tcp() {
    let tmp = tempfile::tempdir().unwrap();
    let port = start_test_server(tmp.path()).await;

    let response = raw_get(port, "/health").await;
    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(response.ends_with("OK"), "{response}");
}

#[tokio::test]
async fn test_openapi_document_lists_routes() {
    let tmp = tempfile::tempdir().unwrap();
    let port = start_test_server(tmp.path()).await;

    let response = raw_get(port, "/api-docs/openapi.json").await;
    assert!(response.starts_with("HTTP/1.1 200"), "{response}");

    let body = response.split("\r\n\r\n").nth(1).unwrap_or_default();
    let doc: serde_json::Value = serde_json::from_str(body).expect("OpenAPI body is JSON");
    assert_eq!(doc["info"]["title"], "Cartoonify API");
    assert!(doc["paths"]["/api/cartoonify"]["post"].is_object());
    assert!(doc["paths"]["/processed/{name}"]["get"].is_object());
}

#[tokio::test]
async fn test_startup_creates_output_dir() {
    let tmp = tempfile::tempdir().unwrap();
    let output_dir = tmp.path().join("static").join("processed");
    assert!(!output_dir.exists());

    start_test_server(&output_dir).await;
    assert!(output_dir.is_dir());
}
