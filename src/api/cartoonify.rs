use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::Json,
};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::models::RequestParams;
use crate::services::{CartoonOutcome, CartoonService};

/// Upload extensions the service accepts (compared case-insensitively)
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

/// Multipart form for `POST /api/cartoonify`
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct CartoonifyForm {
    /// The photo (png, jpg, jpeg or webp)
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
    #[schema(inline)]
    params: RequestParams,
}

/// Response from a successful conversion
#[derive(Debug, Serialize, ToSchema)]
pub struct CartoonifyResponse {
    /// Always 200
    pub status: u16,
    /// Where the PNG can be fetched
    #[schema(example = "/processed/cartoon_20260101120000_1a2b3c4d.png")]
    pub cartoon_image_url: String,
    pub width: u32,
    pub height: u32,
    /// Number of distinct cel colors
    pub palette_size: usize,
    /// Cel colors as `#rrggbb`
    pub palette: Vec<String>,
    /// "inked" or "blank" (no lines were found)
    #[schema(example = "inked")]
    pub edges: String,
}

impl From<CartoonOutcome> for CartoonifyResponse {
    fn from(outcome: CartoonOutcome) -> Self {
        Self {
            status: 200,
            cartoon_image_url: outcome.url(),
            width: outcome.width,
            height: outcome.height,
            palette_size: outcome.palette_size,
            palette: outcome.palette,
            edges: outcome.edges.as_str().to_string(),
        }
    }
}

/// Convert a photo into a cartoon
///
/// Accepts a multipart upload with a `file` field and optional pipeline
/// parameters. Malformed parameters fall back to their defaults.
#[utoipa::path(
    post,
    path = "/api/cartoonify",
    request_body(content = CartoonifyForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Cartoon produced", body = CartoonifyResponse),
        (status = 400, description = "Missing file, unsupported type or undecodable image"),
        (status = 413, description = "Upload too large"),
        (status = 500, description = "Processing failed"),
    ),
    tag = "Cartoonify"
)]
pub async fn handle_cartoonify(
    State(service): State<Arc<CartoonService>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<CartoonifyResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let limit = service.max_upload_bytes();

    let mut params = RequestParams::default();
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let data = field.bytes().await.map_err(|e| multipart_error(e, limit))?;
            upload = Some((file_name, data.to_vec()));
        } else {
            let value = field.text().await.map_err(|e| multipart_error(e, limit))?;
            if !params.set(&name, value) {
                tracing::debug!(field = %name, "Ignoring unknown form field");
            }
        }
    }

    let (file_name, data) = upload.ok_or_else(|| ApiError::BadRequest("No file part".into()))?;
    if file_name.is_empty() {
        return Err(ApiError::BadRequest("No selected file".into()));
    }
    if !has_allowed_extension(&file_name) {
        tracing::info!(file_name = %file_name, "Rejected upload type");
        return Err(ApiError::UnsupportedType(file_name));
    }

    tracing::info!(file_name = %file_name, size_bytes = data.len(), "Upload received");

    let outcome = service.cartoonify(data, params).await?;
    Ok(Json(outcome.into()))
}

fn multipart_error(e: axum::extract::multipart::MultipartError, limit: usize) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge { limit }
    } else {
        ApiError::BadRequest(e.body_text())
    }
}

/// True when the file name ends in one of [`ALLOWED_EXTENSIONS`].
pub fn has_allowed_extension(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ALLOWED_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cel_shade::EdgeOutcome;

    #[test]
    fn test_allowed_extensions() {
        for name in ["a.png", "b.JPG", "c.jpeg", "d.WebP", "dir.x/photo.jpg"] {
            assert!(has_allowed_extension(name), "{name}");
        }
        for name in ["a.gif", "b.bmp", "png", "noext", "c.png.exe", ".png", ""] {
            assert!(!has_allowed_extension(name), "{name}");
        }
    }

    #[test]
    fn test_response_from_outcome() {
        let outcome = CartoonOutcome {
            name: "cartoon_20260101000000_00ff00ff.png".to_string(),
            width: 512,
            height: 341,
            palette: vec!["#112233".to_string()],
            palette_size: 1,
            edges: EdgeOutcome::Blank,
        };

        let response = CartoonifyResponse::from(outcome);
        assert_eq!(response.status, 200);
        assert_eq!(
            response.cartoon_image_url,
            "/processed/cartoon_20260101000000_00ff00ff.png"
        );
        assert_eq!(response.edges, "blank");

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["width"], 512);
        assert_eq!(json["palette"][0], "#112233");
    }
}
