use cel_shade::{CartoonConfig, Cartoonifier, EdgeOutcome};

use crate::error::ApiError;
use crate::models::{AppConfig, RequestParams};
use crate::services::OutputStore;

/// What a successful conversion produced.
#[derive(Debug, Clone)]
pub struct CartoonOutcome {
    /// File name inside the output directory
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Palette as `#rrggbb` strings
    pub palette: Vec<String>,
    pub palette_size: usize,
    pub edges: EdgeOutcome,
}

impl CartoonOutcome {
    /// Public URL of the produced image.
    pub fn url(&self) -> String {
        format!("/processed/{}", self.name)
    }
}

/// Runs the pipeline for uploads and stores the results.
pub struct CartoonService {
    defaults: CartoonConfig,
    store: OutputStore,
    max_upload_bytes: usize,
}

impl CartoonService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            defaults: config.defaults.clone().clamped(),
            store: OutputStore::new(&config.output_dir),
            max_upload_bytes: config.max_upload_bytes,
        }
    }

    pub fn store(&self) -> &OutputStore {
        &self.store
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// Convert one uploaded image and write the PNG to the output store.
    ///
    /// The pipeline is CPU-bound, so it runs on the blocking pool. Nothing
    /// is written unless encoding succeeded.
    pub async fn cartoonify(
        &self,
        bytes: Vec<u8>,
        params: RequestParams,
    ) -> Result<CartoonOutcome, ApiError> {
        if bytes.len() > self.max_upload_bytes {
            return Err(ApiError::PayloadTooLarge {
                limit: self.max_upload_bytes,
            });
        }

        let config = params.into_config(&self.defaults);
        tracing::debug!(
            blur_type = %config.blur_type,
            num_colors = config.num_colors,
            line_strength = config.line_strength,
            target_long_side = config.target_long_side,
            upscale_small = config.upscale_small,
            quantizer = %config.quantizer,
            "Cartoonify request"
        );

        let (rendering, png) = tokio::task::spawn_blocking(move || {
            let rendering = Cartoonifier::new(config).process_bytes(&bytes)?;
            let png = rendering.to_png()?;
            Ok::<_, cel_shade::CartoonError>((rendering, png))
        })
        .await
        .map_err(|e| ApiError::Internal(format!("Pipeline task failed: {e}")))??;

        let name = self
            .store
            .save(&png)
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to store output: {e}")))?;

        let (width, height) = rendering.dimensions();
        let outcome = CartoonOutcome {
            name,
            width,
            height,
            palette: rendering.palette().to_hex(),
            palette_size: rendering.palette_size(),
            edges: rendering.edges(),
        };

        tracing::info!(
            name = %outcome.name,
            width,
            height,
            palette_size = outcome.palette_size,
            edges = outcome.edges.as_str(),
            size_bytes = png.len(),
            "Cartoon stored"
        );

        Ok(outcome)
    }
}
