use image::RgbImage;

use crate::api::ProcessingError;
use crate::edges::EdgeMask;
use crate::preprocess::unsharp_mask;
use crate::smooth::{bilateral_filter, BilateralParams};

/// Share of the output that always comes from the color layer.
pub const COLOR_WEIGHT: f32 = 0.88;
/// Share modulated by the edge mask.
pub const EDGE_WEIGHT: f32 = 0.12;

const CONTRAST: f32 = 1.06;
const SHARPEN_SIGMA: f32 = 0.8;
const SHARPEN_AMOUNT: f32 = 0.4;
const FINISH: BilateralParams = BilateralParams::new(2, 20.0, 2.0);

/// Ink the color layer with the edge mask.
///
/// `out = color * (0.88 + 0.12 * mask / 255)`: paper (255) leaves the color
/// unchanged, full ink darkens it by 12%.
pub fn composite(color: &RgbImage, edges: &EdgeMask) -> Result<RgbImage, ProcessingError> {
    if color.dimensions() != edges.dimensions() {
        return Err(ProcessingError::DimensionMismatch {
            stage: "composite",
            expected: color.dimensions(),
            actual: edges.dimensions(),
        });
    }

    let mut out = color.clone();
    let dst: &mut [u8] = &mut out;
    for (px, m) in dst.chunks_exact_mut(3).zip(edges.mask().as_raw()) {
        let factor = COLOR_WEIGHT + EDGE_WEIGHT * f32::from(*m) / 255.0;
        for v in px {
            *v = (f32::from(*v) * factor).round().clamp(0.0, 255.0) as u8;
        }
    }
    Ok(out)
}

/// Final contrast, sharpening and a very light edge-preserving pass.
pub fn tone_map(image: &RgbImage) -> RgbImage {
    let mut boosted = image.clone();
    let dst: &mut [u8] = &mut boosted;
    for v in dst.iter_mut() {
        *v = (f32::from(*v) * CONTRAST).round().clamp(0.0, 255.0) as u8;
    }

    let sharpened = unsharp_mask(&boosted, SHARPEN_SIGMA, SHARPEN_AMOUNT);
    bilateral_filter(&sharpened, FINISH)
}
