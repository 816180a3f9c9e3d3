use image::imageops::{self, FilterType};
use image::RgbImage;

use super::sharpen::unsharp_mask;

/// Short-side floor below which [`upscale_small`] enlarges an image.
pub const UPSCALE_FLOOR: u32 = 512;

const UPSCALE_SHARPEN_SIGMA: f32 = 1.6;
const UPSCALE_SHARPEN_AMOUNT: f32 = 0.8;

/// Target dimensions for the adaptive upscale, or `None` when no upscale
/// applies.
///
/// The scale factor maps the long side onto [`UPSCALE_FLOOR`] and is only
/// used when it enlarges, so a 300x200 input becomes 512x341 while a
/// 1000x300 panorama is left alone.
pub fn upscaled_dimensions(width: u32, height: u32) -> Option<(u32, u32)> {
    if width == 0 || height == 0 || width.min(height) >= UPSCALE_FLOOR {
        return None;
    }
    let scale = f64::from(UPSCALE_FLOOR) / f64::from(width.max(height));
    if scale <= 1.0 {
        return None;
    }
    Some((scale_dim(width, scale), scale_dim(height, scale)))
}

/// Enlarge a small image and sharpen it. Returns the input unchanged when
/// the floor is already met.
pub fn upscale_small(image: RgbImage) -> RgbImage {
    let (width, height) = image.dimensions();
    let Some((new_w, new_h)) = upscaled_dimensions(width, height) else {
        return image;
    };

    tracing::debug!(
        from_width = width,
        from_height = height,
        to_width = new_w,
        to_height = new_h,
        "Upscaling small input"
    );

    let enlarged = imageops::resize(&image, new_w, new_h, FilterType::CatmullRom);
    unsharp_mask(&enlarged, UPSCALE_SHARPEN_SIGMA, UPSCALE_SHARPEN_AMOUNT)
}

/// Dimensions with the long side set to `long_side`, aspect preserved.
pub fn fit_long_side(width: u32, height: u32, long_side: u32) -> (u32, u32) {
    let current = width.max(height);
    if current == 0 || current == long_side {
        return (width, height);
    }
    let scale = f64::from(long_side) / f64::from(current);
    (scale_dim(width, scale), scale_dim(height, scale))
}

/// Resize so the long side equals `long_side`.
pub fn normalize_long_side(image: RgbImage, long_side: u32) -> RgbImage {
    let (width, height) = image.dimensions();
    let (new_w, new_h) = fit_long_side(width, height, long_side);
    if (new_w, new_h) == (width, height) {
        return image;
    }

    let filter = if new_w.max(new_h) < width.max(height) {
        FilterType::Triangle
    } else {
        FilterType::CatmullRom
    };
    tracing::debug!(
        to_width = new_w,
        to_height = new_h,
        ?filter,
        "Normalizing working copy"
    );
    imageops::resize(&image, new_w, new_h, filter)
}

/// Bring a working-resolution layer back to the reference dimensions.
pub fn restore(image: RgbImage, width: u32, height: u32) -> RgbImage {
    if image.dimensions() == (width, height) {
        return image;
    }
    imageops::resize(&image, width, height, FilterType::Nearest)
}

fn scale_dim(value: u32, scale: f64) -> u32 {
    ((f64::from(value) * scale).round() as u32).max(1)
}
