pub mod cartoonify;
pub mod processed;

pub use cartoonify::{
    handle_cartoonify, has_allowed_extension, CartoonifyForm, CartoonifyResponse,
    __path_handle_cartoonify, ALLOWED_EXTENSIONS,
};
pub use processed::{handle_processed, __path_handle_processed};

use utoipa::OpenApi;

use crate::models::RequestParams;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cartoonify API",
        description = "Turn photo uploads into flat-color, inked cartoon renderings",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(handle_cartoonify, handle_processed),
    components(schemas(CartoonifyForm, CartoonifyResponse, RequestParams)),
    tags(
        (name = "Cartoonify", description = "Photo upload and cartoon retrieval")
    )
)]
pub struct ApiDoc;
