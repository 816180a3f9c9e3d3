//! The successful result of a pipeline run.

use image::RgbImage;

use super::error::Result;
use crate::output::encode_png;
use crate::palette::Palette;

/// Whether the edge extractor found anything to ink.
///
/// A blank result is a valid rendering (a flat wall photographs as a flat
/// wall), not an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeOutcome {
    /// Lines were drawn over `coverage` (0.0..=1.0) of the image.
    Inked { coverage: f32 },
    /// No boundary was detected; the output carries no line art.
    Blank,
}

impl EdgeOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            EdgeOutcome::Inked { .. } => "inked",
            EdgeOutcome::Blank => "blank",
        }
    }

    #[inline]
    pub fn is_blank(self) -> bool {
        matches!(self, EdgeOutcome::Blank)
    }
}

/// Cartoon image plus what the pipeline learned producing it.
///
/// # Example
///
/// ```
/// use cel_shade::{BlurType, CartoonConfig, Cartoonifier, QuantizerKind};
/// use image::{Rgb, RgbImage};
///
/// let photo = RgbImage::from_pixel(600, 520, Rgb([40, 120, 200]));
/// let config = CartoonConfig::new()
///     .target_long_side(256)
///     .blur_type(BlurType::Median)
///     .quantizer(QuantizerKind::MedianCut);
///
/// let rendering = Cartoonifier::new(config).process(photo).unwrap();
/// assert_eq!(rendering.dimensions(), (600, 520));
/// assert_eq!(rendering.working_size(), (256, 222));
/// assert!(rendering.edges().is_blank());
/// ```
#[derive(Debug, Clone)]
pub struct Rendering {
    pub(crate) image: RgbImage,
    pub(crate) palette: Palette,
    pub(crate) source_size: (u32, u32),
    pub(crate) working_size: (u32, u32),
    pub(crate) upscaled: bool,
    pub(crate) edges: EdgeOutcome,
}

impl Rendering {
    /// The final cartoon image.
    #[inline]
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    #[inline]
    pub fn into_image(self) -> RgbImage {
        self.image
    }

    /// Output dimensions: the oriented input, after any upscale.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Palette the quantizer settled on.
    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Number of distinct cel colors.
    #[inline]
    pub fn palette_size(&self) -> usize {
        self.palette.distinct_len()
    }

    /// Oriented input dimensions, before any upscale.
    #[inline]
    pub fn source_size(&self) -> (u32, u32) {
        self.source_size
    }

    /// Dimensions of the copy that was smoothed and quantized.
    #[inline]
    pub fn working_size(&self) -> (u32, u32) {
        self.working_size
    }

    /// True when the adaptive upscaler enlarged the input.
    #[inline]
    pub fn upscaled(&self) -> bool {
        self.upscaled
    }

    #[inline]
    pub fn edges(&self) -> EdgeOutcome {
        self.edges
    }

    /// Encode the image as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        Ok(encode_png(&self.image)?)
    }
}
