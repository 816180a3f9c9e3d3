//! Edge-aware bilateral filter.
//!
//! Each output pixel is a weighted mean over a circular window. The weight
//! of a neighbour is the product of a spatial Gaussian on its distance and
//! a range Gaussian on its color difference, so pixels across a strong
//! boundary contribute almost nothing and the boundary survives.
//!
//! The color difference is the L1 distance over the three channels
//! (0..=765), which keeps the range weights in a small lookup table.

use image::RgbImage;

const MAX_L1_DISTANCE: usize = 3 * 255;

/// Window and tolerances for one bilateral pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BilateralParams {
    /// Window radius in pixels.
    pub radius: u32,
    /// Range tolerance; larger values smooth across stronger color steps.
    pub sigma_color: f32,
    /// Spatial falloff in pixels.
    pub sigma_space: f32,
}

impl BilateralParams {
    #[inline]
    pub const fn new(radius: u32, sigma_color: f32, sigma_space: f32) -> Self {
        Self {
            radius,
            sigma_color,
            sigma_space,
        }
    }

    /// Scale all three parameters by `strength`. The radius never drops
    /// below 1.
    pub fn scaled(self, strength: f32) -> Self {
        Self {
            radius: ((self.radius as f32 * strength).round() as u32).max(1),
            sigma_color: self.sigma_color * strength,
            sigma_space: self.sigma_space * strength,
        }
    }
}

/// Apply one bilateral pass. Borders are handled by clamping coordinates.
pub fn bilateral_filter(image: &RgbImage, params: BilateralParams) -> RgbImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 || params.radius == 0 {
        return image.clone();
    }

    let radius = params.radius as i64;
    let sigma_space = params.sigma_space.max(1e-3);
    let sigma_color = params.sigma_color.max(1e-3);

    let space_denom = 2.0 * sigma_space * sigma_space;
    let mut taps = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let d2 = dx * dx + dy * dy;
            if d2 > radius * radius {
                continue;
            }
            taps.push((dx, dy, (-(d2 as f32) / space_denom).exp()));
        }
    }

    let color_denom = 2.0 * sigma_color * sigma_color;
    let range: Vec<f32> = (0..=MAX_L1_DISTANCE)
        .map(|d| (-((d * d) as f32) / color_denom).exp())
        .collect();

    let (w, h) = (i64::from(width), i64::from(height));
    let src = image.as_raw();
    let mut out = RgbImage::new(width, height);
    let dst: &mut [u8] = &mut out;

    for y in 0..h {
        for x in 0..w {
            let ci = ((y * w + x) * 3) as usize;
            let center = &src[ci..ci + 3];

            let mut acc = [0.0f32; 3];
            let mut weight_sum = 0.0f32;
            for &(dx, dy, spatial) in &taps {
                let nx = (x + dx).clamp(0, w - 1);
                let ny = (y + dy).clamp(0, h - 1);
                let ni = ((ny * w + nx) * 3) as usize;
                let n = &src[ni..ni + 3];

                let diff = center[0].abs_diff(n[0]) as usize
                    + center[1].abs_diff(n[1]) as usize
                    + center[2].abs_diff(n[2]) as usize;
                let weight = spatial * range[diff];

                acc[0] += weight * f32::from(n[0]);
                acc[1] += weight * f32::from(n[1]);
                acc[2] += weight * f32::from(n[2]);
                weight_sum += weight;
            }

            // The center tap always has weight 1.
            for c in 0..3 {
                dst[ci + c] = (acc[c] / weight_sum).round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    out
}
