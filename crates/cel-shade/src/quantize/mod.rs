//! Color quantization.
//!
//! Reduces the smoothed working copy to a handful of flat cel colors. Two
//! algorithms implement the [`Quantize`] trait and are selected at runtime
//! through [`Quantizer`]:
//!
//! - [`KMeansQuantizer`]: best-of-N weighted k-means with k-means++ seeding.
//!   Stochastic unless seeded; labels are cleaned with a 3x3 majority
//!   filter afterwards.
//! - [`MedianCutQuantizer`]: recursive weighted-median split of the color
//!   histogram. Deterministic.
//!
//! Both return a [`Quantized`] label map over a [`Palette`] of at most the
//! requested size. An image with fewer distinct colors than requested keeps
//! exactly its own colors.
//!
//! # Example
//!
//! ```
//! use cel_shade::{MedianCutQuantizer, Quantize};
//! use image::{Rgb, RgbImage};
//!
//! let img = RgbImage::from_fn(8, 8, |x, _| Rgb([x as u8 * 30, 0, 0]));
//! let q = MedianCutQuantizer.quantize(&img, 4).unwrap();
//! assert_eq!(q.palette.len(), 4);
//! assert_eq!(q.to_image().dimensions(), (8, 8));
//! ```

mod histogram;
mod kmeans;
mod median_cut;

use image::RgbImage;

use crate::api::ProcessingError;
use crate::options::{CartoonConfig, QuantizerKind};
use crate::palette::Palette;

pub use histogram::ColorHistogram;
pub use kmeans::KMeansQuantizer;
pub use median_cut::MedianCutQuantizer;

/// A palette plus one palette index per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quantized {
    pub palette: Palette,
    /// Row-major palette indices, `width * height` long.
    pub labels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl Quantized {
    /// Paint every pixel with its palette color.
    pub fn to_image(&self) -> RgbImage {
        let mut out = RgbImage::new(self.width, self.height);
        for (px, &label) in out.pixels_mut().zip(&self.labels) {
            *px = self.palette.get(usize::from(label));
        }
        out
    }
}

/// Palette reduction algorithm.
pub trait Quantize {
    /// Reduce `image` to at most `colors` colors.
    ///
    /// # Errors
    ///
    /// [`ProcessingError::Transform`] for an empty image or a request for
    /// zero colors.
    fn quantize(&self, image: &RgbImage, colors: usize) -> Result<Quantized, ProcessingError>;
}

/// Runtime selection between the available quantizers.
#[derive(Debug, Clone, PartialEq)]
pub enum Quantizer {
    KMeans(KMeansQuantizer),
    MedianCut(MedianCutQuantizer),
}

impl Quantizer {
    /// Build the quantizer a configuration asks for. The k-means seed is
    /// taken from the configuration.
    pub fn from_config(config: &CartoonConfig) -> Self {
        match config.quantizer {
            QuantizerKind::KMeans => {
                let mut kmeans = KMeansQuantizer::new();
                if let Some(seed) = config.seed {
                    kmeans = kmeans.seed(seed);
                }
                Quantizer::KMeans(kmeans)
            }
            QuantizerKind::MedianCut => Quantizer::MedianCut(MedianCutQuantizer),
        }
    }

    pub fn kind(&self) -> QuantizerKind {
        match self {
            Quantizer::KMeans(_) => QuantizerKind::KMeans,
            Quantizer::MedianCut(_) => QuantizerKind::MedianCut,
        }
    }
}

impl Quantize for Quantizer {
    fn quantize(&self, image: &RgbImage, colors: usize) -> Result<Quantized, ProcessingError> {
        match self {
            Quantizer::KMeans(q) => q.quantize(image, colors),
            Quantizer::MedianCut(q) => q.quantize(image, colors),
        }
    }
}

/// Common argument checks. Palette indices are stored as `u8`.
fn check_request(image: &RgbImage, colors: usize) -> Result<usize, ProcessingError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(ProcessingError::Transform {
            stage: "quantize",
            reason: "empty image".to_string(),
        });
    }
    if colors == 0 {
        return Err(ProcessingError::Transform {
            stage: "quantize",
            reason: "zero colors requested".to_string(),
        });
    }
    Ok(colors.min(256))
}

/// Map every pixel to the label of its histogram entry.
fn label_pixels(image: &RgbImage, histogram: &ColorHistogram, entry_labels: &[u8]) -> Vec<u8> {
    image
        .pixels()
        .map(|p| {
            histogram
                .index_of(p.0)
                .map_or(0, |idx| entry_labels[idx])
        })
        .collect()
}

/// 3x3 majority vote over a label map. The center label wins ties.
fn majority_filter(labels: &[u8], width: u32, height: u32) -> Vec<u8> {
    let (w, h) = (width as i64, height as i64);
    let mut out = labels.to_vec();
    let mut votes = [0u8; 256];

    for y in 0..h {
        for x in 0..w {
            let center = labels[(y * w + x) as usize];
            let mut seen = [0u8; 9];
            let mut n = 0;
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let nx = (x + dx).clamp(0, w - 1);
                    let ny = (y + dy).clamp(0, h - 1);
                    let label = labels[(ny * w + nx) as usize];
                    votes[usize::from(label)] += 1;
                    seen[n] = label;
                    n += 1;
                }
            }

            let mut best = center;
            let mut best_votes = votes[usize::from(center)];
            for &label in &seen {
                if votes[usize::from(label)] > best_votes {
                    best = label;
                    best_votes = votes[usize::from(label)];
                }
            }
            out[(y * w + x) as usize] = best;

            for &label in &seen {
                votes[usize::from(label)] = 0;
            }
        }
    }
    out
}
