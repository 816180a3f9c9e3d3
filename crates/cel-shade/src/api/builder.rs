//! Cartoonifier -- the pipeline orchestrator and primary entry point.

use std::path::Path;
use std::time::Instant;

use image::RgbImage;

use super::error::{InputError, Result};
use super::rendering::{EdgeOutcome, Rendering};
use crate::edges::extract_edges;
use crate::load::{load_bytes, load_path};
use crate::options::CartoonConfig;
use crate::output::{composite, tone_map};
use crate::preprocess::{normalize_long_side, restore, upscale_small, upscaled_dimensions};
use crate::quantize::{Quantize, Quantizer};
use crate::smooth::smooth;

/// Runs the cartoon pipeline under one configuration.
///
/// - The configuration is clamped on construction, so any `CartoonConfig`
///   (including a struct literal or deserialized value) is accepted.
/// - [`process`](Self::process) takes `&self`; one `Cartoonifier` can be
///   shared across threads and reused for many images.
/// - No filesystem writes happen here. [`process_path`](Self::process_path)
///   only reads.
///
/// # Example
///
/// ```
/// use cel_shade::{BlurType, CartoonConfig, Cartoonifier, QuantizerKind};
/// use image::{Rgb, RgbImage};
///
/// let photo = RgbImage::from_fn(300, 200, |x, y| {
///     if x < 150 { Rgb([200, 60, 40]) } else { Rgb([30, 90, 160 + (y % 20) as u8]) }
/// });
///
/// let cartoonifier = Cartoonifier::new(
///     CartoonConfig::new()
///         .blur_type(BlurType::Median)
///         .quantizer(QuantizerKind::MedianCut)
///         .num_colors(6),
/// );
/// let rendering = cartoonifier.process(photo).unwrap();
///
/// assert_eq!(rendering.dimensions(), (512, 341));
/// assert!(rendering.upscaled());
/// assert!(rendering.palette_size() <= 6);
/// ```
#[derive(Debug, Clone)]
pub struct Cartoonifier {
    config: CartoonConfig,
    quantizer: Quantizer,
}

impl Default for Cartoonifier {
    fn default() -> Self {
        Self::new(CartoonConfig::default())
    }
}

impl Cartoonifier {
    /// Create a cartoonifier. Out-of-range values are clamped.
    pub fn new(config: CartoonConfig) -> Self {
        let config = config.clamped();
        let quantizer = Quantizer::from_config(&config);
        Self { config, quantizer }
    }

    /// The effective (clamped) configuration.
    #[inline]
    pub fn config(&self) -> &CartoonConfig {
        &self.config
    }

    /// Decode `bytes` and run the pipeline.
    pub fn process_bytes(&self, bytes: &[u8]) -> Result<Rendering> {
        let image = load_bytes(bytes)?;
        self.process(image)
    }

    /// Read and decode the file at `path` and run the pipeline.
    pub fn process_path(&self, path: impl AsRef<Path>) -> Result<Rendering> {
        let image = load_path(path.as_ref())?;
        self.process(image)
    }

    /// Run the pipeline on an already decoded, upright image.
    ///
    /// Output dimensions equal the input's, or the upscaled dimensions when
    /// the adaptive upscaler applied.
    pub fn process(&self, image: RgbImage) -> Result<Rendering> {
        let start = Instant::now();
        let config = &self.config;
        let source_size = image.dimensions();
        let (width, height) = source_size;
        if width == 0 || height == 0 {
            return Err(InputError::ZeroSize { width, height }.into());
        }

        // 1. Full-resolution reference
        let upscaled = config.upscale_small && upscaled_dimensions(width, height).is_some();
        let reference = if upscaled { upscale_small(image) } else { image };
        let (full_w, full_h) = reference.dimensions();

        // 2. Color branch on the working copy
        let stage = Instant::now();
        let working = normalize_long_side(reference.clone(), config.working_long_side());
        let working_size = working.dimensions();
        let smoothed = smooth(&working, config.blur_type);
        tracing::debug!(
            width = working_size.0,
            height = working_size.1,
            blur = %config.blur_type,
            elapsed_ms = stage.elapsed().as_millis() as u64,
            "Smoothed working copy"
        );

        let stage = Instant::now();
        let quantized = self.quantizer.quantize(&smoothed, config.num_colors)?;
        let palette = quantized.palette.clone();
        let flat = restore(quantized.to_image(), full_w, full_h);
        tracing::debug!(
            quantizer = %self.quantizer.kind(),
            requested = config.num_colors,
            palette_size = palette.distinct_len(),
            elapsed_ms = stage.elapsed().as_millis() as u64,
            "Quantized"
        );

        // 3. Line branch on the reference
        let stage = Instant::now();
        let edges = extract_edges(&reference, config.line_strength);
        tracing::debug!(
            coverage = edges.coverage(),
            elapsed_ms = stage.elapsed().as_millis() as u64,
            "Extracted edges"
        );

        // 4. Rejoin
        let inked = composite(&flat, &edges)?;
        let image = tone_map(&inked);

        let outcome = if edges.is_blank() {
            EdgeOutcome::Blank
        } else {
            EdgeOutcome::Inked {
                coverage: edges.coverage(),
            }
        };

        tracing::info!(
            source_width = width,
            source_height = height,
            width = full_w,
            height = full_h,
            upscaled,
            edges = outcome.as_str(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Cartoonified image"
        );

        Ok(Rendering {
            image,
            palette,
            source_size,
            working_size,
            upscaled,
            edges: outcome,
        })
    }
}

/// Run the pipeline once with `config`.
///
/// Shorthand for `Cartoonifier::new(config.clone()).process(image)`.
pub fn cartoonify(image: RgbImage, config: &CartoonConfig) -> Result<Rendering> {
    Cartoonifier::new(config.clone()).process(image)
}
