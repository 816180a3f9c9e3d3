use image::RgbImage;
use imageproc::filter::gaussian_blur_f32;

/// Unsharp mask: `src + amount * (src - gaussian(src, sigma))`, per channel.
///
/// A non-positive `sigma` or `amount` returns an unchanged copy.
pub fn unsharp_mask(image: &RgbImage, sigma: f32, amount: f32) -> RgbImage {
    if sigma <= 0.0 || amount <= 0.0 || image.width() == 0 || image.height() == 0 {
        return image.clone();
    }

    let blurred = gaussian_blur_f32(image, sigma);
    let mut out = image.clone();
    let dst: &mut [u8] = &mut out;
    for (d, &b) in dst.iter_mut().zip(blurred.as_raw()) {
        let s = f32::from(*d);
        let v = s + amount * (s - f32::from(b));
        *d = v.round().clamp(0.0, 255.0) as u8;
    }
    out
}
