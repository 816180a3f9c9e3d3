//! Line-art extraction.
//!
//! Runs on the full-resolution reference image, never on the smoothed or
//! quantized copy, so thin features survive:
//!
//! ```text
//! RGB → grayscale → 5x5 median
//!                      |
//!          +-----------+------------+
//!          v                        v
//!   Canny (0.67·m, 1.33·m)   9x9 mean threshold, C = 9
//!          |                        |
//!          +---------- ∪ -----------+
//!                      |
//!                      v
//!          dilate (square, 2r+1, r from line_strength)
//!                      |
//!                      v
//!          Gaussian σ 0.8 → invert
//! ```
//!
//! `m` is the median intensity of the blurred grayscale. The output mask is
//! a light field (255) with dark ink where edges were found.

mod threshold;

use image::{imageops, GrayImage, Luma, RgbImage};
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::filter::{gaussian_blur_f32, median_filter};
use imageproc::morphology::dilate;

pub use threshold::{adaptive_mean_threshold, canny_thresholds, dilation_radius, median_intensity};

const PRE_BLUR_RADIUS: u32 = 2;
const ADAPTIVE_BLOCK: u32 = 9;
const ADAPTIVE_C: i32 = 9;
const ANTIALIAS_SIGMA: f32 = 0.8;

/// Inverted ink mask plus the number of inked pixels found before
/// anti-aliasing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeMask {
    mask: GrayImage,
    ink_pixels: u64,
}

impl EdgeMask {
    /// Single-channel mask: 255 is untouched paper, lower values are ink.
    #[inline]
    pub fn mask(&self) -> &GrayImage {
        &self.mask
    }

    #[inline]
    pub fn into_mask(self) -> GrayImage {
        self.mask
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.mask.dimensions()
    }

    #[inline]
    pub fn ink_pixels(&self) -> u64 {
        self.ink_pixels
    }

    /// Fraction of pixels carrying ink, in 0.0..=1.0.
    pub fn coverage(&self) -> f32 {
        let total = u64::from(self.mask.width()) * u64::from(self.mask.height());
        if total == 0 {
            return 0.0;
        }
        (self.ink_pixels as f64 / total as f64) as f32
    }

    /// True when no boundary was detected anywhere.
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.ink_pixels == 0
    }
}

/// Extract an inverted edge mask from `image`.
///
/// `line_strength` (0.1..=1.0) controls thickness: 0.1 dilates with a 5x5
/// kernel, 1.0 leaves the raw one-pixel lines.
pub fn extract_edges(image: &RgbImage, line_strength: f32) -> EdgeMask {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return EdgeMask {
            mask: GrayImage::new(width, height),
            ink_pixels: 0,
        };
    }

    let gray = imageops::grayscale(image);
    let gray = median_filter(&gray, PRE_BLUR_RADIUS, PRE_BLUR_RADIUS);

    let median = median_intensity(&gray);
    let (low, high) = canny_thresholds(median);

    let mut ink = adaptive_mean_threshold(&gray, ADAPTIVE_BLOCK, ADAPTIVE_C);
    // Canny needs a 3x3 neighbourhood for its gradients.
    if width >= 3 && height >= 3 {
        let strong = canny(&gray, low, high);
        for (dst, src) in ink.pixels_mut().zip(strong.pixels()) {
            dst[0] = dst[0].max(src[0]);
        }
    }

    let radius = dilation_radius(line_strength);
    if radius > 0 {
        ink = dilate(&ink, Norm::LInf, radius);
    }

    let ink_pixels = ink.pixels().filter(|p| p[0] > 0).count() as u64;

    let mut mask = if ink_pixels > 0 {
        gaussian_blur_f32(&ink, ANTIALIAS_SIGMA)
    } else {
        ink
    };
    imageops::invert(&mut mask);

    tracing::debug!(
        width,
        height,
        median,
        canny_low = low,
        canny_high = high,
        kernel = u32::from(radius) * 2 + 1,
        ink_pixels,
        "Edge extraction"
    );

    EdgeMask { mask, ink_pixels }
}

/// A mask with no ink, for callers that want to skip line art.
pub fn blank_mask(width: u32, height: u32) -> EdgeMask {
    EdgeMask {
        mask: GrayImage::from_pixel(width, height, Luma([255])),
        ink_pixels: 0,
    }
}
