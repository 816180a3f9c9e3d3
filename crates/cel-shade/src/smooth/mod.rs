//! Base-layer smoothing.
//!
//! Flattens texture ahead of quantization so cels come out as large,
//! clean regions. The strategy is chosen by [`BlurType`]:
//!
//! | Strategy    | Operation                                                  |
//! |-------------|------------------------------------------------------------|
//! | `bilateral` | two bilateral passes (strength-scaled), then 3x3 median   |
//! | `median`    | one 5x5 median                                             |
//! | `gaussian`  | one Gaussian blur, sigma 2                                 |
//!
//! Bilateral strength follows the working resolution: `long_side / 1024`,
//! clamped to 0.5..=1.5, so a small working copy is not over-smoothed.

mod bilateral;

use image::RgbImage;
use imageproc::filter::{gaussian_blur_f32, median_filter};

use crate::options::BlurType;

pub use bilateral::{bilateral_filter, BilateralParams};

const FIRST_PASS: BilateralParams = BilateralParams::new(4, 40.0, 3.0);
const SECOND_PASS: BilateralParams = BilateralParams::new(3, 25.0, 2.0);
const SPECKLE_RADIUS: u32 = 1;
const MEDIAN_RADIUS: u32 = 2;
const GAUSSIAN_SIGMA: f32 = 2.0;

/// Bilateral strength for an image with the given long side.
pub fn bilateral_strength(long_side: u32) -> f32 {
    (long_side as f32 / 1024.0).clamp(0.5, 1.5)
}

/// Smooth `image` with the selected strategy.
pub fn smooth(image: &RgbImage, blur: BlurType) -> RgbImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }

    match blur {
        BlurType::Bilateral => {
            let strength = bilateral_strength(width.max(height));
            let first = FIRST_PASS.scaled(strength);
            let second = SECOND_PASS.scaled(strength);
            tracing::debug!(strength, ?first, ?second, "Bilateral smoothing");

            let pass = bilateral_filter(image, first);
            let pass = bilateral_filter(&pass, second);
            median_filter(&pass, SPECKLE_RADIUS, SPECKLE_RADIUS)
        }
        BlurType::Median => {
            tracing::debug!(radius = MEDIAN_RADIUS, "Median smoothing");
            median_filter(image, MEDIAN_RADIUS, MEDIAN_RADIUS)
        }
        BlurType::Gaussian => {
            tracing::debug!(sigma = GAUSSIAN_SIGMA, "Gaussian smoothing");
            gaussian_blur_f32(image, GAUSSIAN_SIGMA)
        }
    }
}
