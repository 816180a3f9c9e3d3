//! Test application factory for integration tests.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use std::path::Path;
use tempfile::TempDir;
use tower::ServiceExt;

use cartoonify::models::AppConfig;
use cartoonify::server::{build_router, create_app_state, AppState};

use super::fixtures::{multipart_body, Part, BOUNDARY};

/// Test application with router and a private output directory
pub struct TestApp {
    router: axum::Router,
    pub state: AppState,
    output_dir: TempDir,
}

impl TestApp {
    /// Create a new test application with default configuration
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a test application; the output directory is always replaced
    /// by a fresh temporary directory.
    pub fn with_config(config: AppConfig) -> Self {
        let output_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = config.with_output_dir(output_dir.path().join("processed"));

        // Create application state using shared server module
        let state = create_app_state(config).expect("Failed to create app state");

        // Build router using shared server module (same as production)
        let router = build_router(state.clone());

        Self {
            router,
            state,
            output_dir,
        }
    }

    /// Directory the service writes produced images to
    pub fn output_dir(&self) -> &Path {
        self.state.service.store().dir()
    }

    /// Names of all files currently in the output directory
    pub fn output_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.output_dir())
            .expect("Failed to list output dir")
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Make a GET request to the given path
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// POST a raw body with the given content type
    pub async fn post(&self, path: &str, content_type: &str, body: Vec<u8>) -> TestResponse {
        let request = Request::post(path)
            .header("Content-Type", content_type)
            .body(Body::from(body))
            .unwrap();
        self.request(request).await
    }

    /// POST a multipart form
    pub async fn post_multipart(&self, path: &str, parts: &[Part]) -> TestResponse {
        let request = Request::post(path)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap();
        self.request(request).await
    }

    /// Upload an image to /api/cartoonify with optional text fields
    pub async fn cartoonify(
        &self,
        file_name: &str,
        image: Vec<u8>,
        params: &[(&str, &str)],
    ) -> TestResponse {
        let mut parts = vec![Part::file("file", file_name, image)];
        parts.extend(params.iter().map(|(name, value)| Part::text(name, value)));
        self.post_multipart("/api/cartoonify", &parts).await
    }

    /// Send a request to the router
    async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Test response with convenience methods
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Get body as string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Get raw body bytes
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Check if response is a PNG image
    pub fn is_png(&self) -> bool {
        self.body.len() >= 8 && &self.body[0..8] == b"\x89PNG\r\n\x1a\n"
    }
}
