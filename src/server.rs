//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, Path, State},
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::api::{self, ApiDoc, CartoonifyResponse};
use crate::error::ApiError;
use crate::models::AppConfig;
use crate::services::CartoonService;

/// Room for multipart framing and the small text fields on top of the
/// file itself.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub service: Arc<CartoonService>,
}

/// Create application state, making sure the output directory exists.
pub fn create_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let service = CartoonService::new(&config);
    service.store().ensure_dir().map_err(|e| {
        anyhow::anyhow!(
            "Failed to create output directory {}: {e}",
            service.store().dir().display()
        )
    })?;

    Ok(AppState {
        config: Arc::new(config),
        service: Arc::new(service),
    })
}

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + FORM_OVERHEAD_BYTES;

    Router::new()
        .route(
            "/api/cartoonify",
            post(handle_cartoonify).layer(DefaultBodyLimit::max(body_limit)),
        )
        // Form endpoint used by the browser upload page
        .route(
            "/upload",
            post(handle_cartoonify).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/processed/:name", get(handle_processed))
        // OpenAPI document
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        // Health check
        .route("/health", get(|| async { "OK" }))
        // Add state and tracing
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

// Wrapper handlers to extract state components for the underlying API handlers

async fn handle_cartoonify(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<CartoonifyResponse>, ApiError> {
    api::handle_cartoonify(State(state.service), multipart).await
}

async fn handle_processed(
    State(state): State<AppState>,
    path: Path<String>,
) -> Result<Response, ApiError> {
    api::handle_processed(State(state.service), path).await
}
