use std::io::Cursor;
use std::path::Path;

use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageReader, RgbImage, RgbaImage};

use crate::api::InputError;

/// Read and decode an image file.
///
/// A missing file is reported as [`InputError::Missing`]; any other I/O
/// failure as [`InputError::Unreadable`].
pub fn load_path(path: &Path) -> Result<RgbImage, InputError> {
    let bytes = std::fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            InputError::Missing {
                path: path.to_path_buf(),
            }
        } else {
            InputError::Unreadable {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    load_bytes(&bytes)
}

/// Decode in-memory image bytes into an upright RGB buffer.
pub fn load_bytes(bytes: &[u8]) -> Result<RgbImage, InputError> {
    if bytes.is_empty() {
        return Err(InputError::Empty);
    }

    let image = decode_oriented(bytes)?;
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(InputError::ZeroSize { width, height });
    }

    let rgb = if image.color().has_alpha() {
        flatten_alpha(&image.to_rgba8())
    } else {
        image.into_rgb8()
    };

    tracing::debug!(
        width = rgb.width(),
        height = rgb.height(),
        bytes = bytes.len(),
        "Decoded input image"
    );

    Ok(rgb)
}

fn decode_oriented(bytes: &[u8]) -> Result<DynamicImage, InputError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| InputError::Decode(image::ImageError::IoError(e)))?;
    if reader.format().is_none() {
        return Err(InputError::UnsupportedFormat);
    }

    let mut decoder = reader.into_decoder().map_err(InputError::Decode)?;
    // Broken EXIF is not fatal: the pixels are still usable as stored.
    let orientation = decoder.orientation().unwrap_or_else(|e| {
        tracing::debug!(%e, "Ignoring unreadable orientation metadata");
        Orientation::NoTransforms
    });

    let image = DynamicImage::from_decoder(decoder).map_err(InputError::Decode)?;
    Ok(orient(image, orientation))
}

/// Rotate and flip so the pixel grid matches the intended view.
fn orient(mut image: DynamicImage, orientation: Orientation) -> DynamicImage {
    if orientation != Orientation::NoTransforms {
        tracing::debug!(?orientation, "Applying embedded orientation");
        image.apply_orientation(orientation);
    }
    image
}

/// Composite an RGBA buffer over opaque white.
pub fn flatten_alpha(rgba: &RgbaImage) -> RgbImage {
    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (dst, src) in out.pixels_mut().zip(rgba.pixels()) {
        let alpha = u32::from(src[3]);
        let inverse = 255 - alpha;
        for c in 0..3 {
            dst[c] = ((u32::from(src[c]) * alpha + 255 * inverse + 127) / 255) as u8;
        }
    }
    out
}
