use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::error::ApiError;
use crate::services::CartoonService;

/// Produced files never change once renamed into place.
const IMMUTABLE: &str = "public, max-age=31536000, immutable";

/// Fetch a produced cartoon
#[utoipa::path(
    get,
    path = "/processed/{name}",
    responses(
        (status = 200, description = "PNG image", content_type = "image/png"),
        (status = 404, description = "No such image"),
    ),
    params(
        ("name" = String, Path, description = "File name from cartoon_image_url"),
    ),
    tag = "Cartoonify"
)]
pub async fn handle_processed(
    State(service): State<Arc<CartoonService>>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    let path = service.store().resolve(&name).ok_or(ApiError::NotFound)?;

    let png = match tokio::fs::read(&path).await {
        Ok(png) => png,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(ApiError::NotFound),
        Err(e) => return Err(ApiError::Internal(format!("Failed to read {name}: {e}"))),
    };

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, IMMUTABLE),
        ],
        Bytes::from(png),
    )
        .into_response())
}
