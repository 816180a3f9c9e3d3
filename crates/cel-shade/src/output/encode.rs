use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, RgbImage};

use crate::api::ProcessingError;

/// Encode an RGB image as PNG with fast compression.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, ProcessingError> {
    let mut buf = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut buf, CompressionType::Fast, FilterType::Adaptive);
    encoder
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(ProcessingError::Encode)?;
    Ok(buf)
}
