//! Weighted k-means over the color histogram.
//!
//! Each attempt seeds its centers with k-means++ (first center drawn by
//! pixel count, later ones by count times squared distance to the nearest
//! chosen center), then alternates assignment and update until no center
//! moves by more than `epsilon` or `max_iterations` is reached. The attempt
//! with the lowest compactness (weighted sum of squared distances) wins.
//!
//! Training uses a grid sample of the image capped at
//! [`MAX_TRAINING_PIXELS`]; the final palette is then assigned to every
//! distinct color of the full image.

use image::RgbImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::histogram::ColorHistogram;
use super::{check_request, label_pixels, majority_filter, Quantize, Quantized};
use crate::api::ProcessingError;
use crate::palette::Palette;

/// Upper bound on the number of pixels used to fit the centers.
pub const MAX_TRAINING_PIXELS: u32 = 65_536;

type Center = [f32; 3];

/// Best-of-N k-means quantizer.
///
/// # Defaults
///
/// - 5 attempts
/// - 20 iterations per attempt
/// - epsilon 0.3 (center movement, in 8-bit RGB units)
/// - entropy seed
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansQuantizer {
    attempts: usize,
    max_iterations: usize,
    epsilon: f32,
    seed: Option<u64>,
}

impl Default for KMeansQuantizer {
    fn default() -> Self {
        Self {
            attempts: 5,
            max_iterations: 20,
            epsilon: 0.3,
            seed: None,
        }
    }
}

impl KMeansQuantizer {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of independent initializations (at least 1).
    #[inline]
    pub fn attempts(mut self, attempts: usize) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    #[inline]
    pub fn max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations.max(1);
        self
    }

    #[inline]
    pub fn epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon.max(0.0);
        self
    }

    /// Fix the RNG seed so repeated runs produce the same palette.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// One seeded clustering run. Returns the centers and their compactness.
    fn attempt(
        &self,
        training: &ColorHistogram,
        k: usize,
        rng: &mut StdRng,
    ) -> (Vec<Center>, f64) {
        let points: Vec<(Center, f32)> = training
            .iter()
            .map(|(c, n)| (to_f32(c), n as f32))
            .collect();

        let mut centers = seed_plus_plus(&points, k, rng);
        let mut assignment = vec![0usize; points.len()];

        for _ in 0..self.max_iterations {
            assign(&points, &centers, &mut assignment);

            let mut sums = vec![[0.0f64; 3]; centers.len()];
            let mut weights = vec![0.0f64; centers.len()];
            for ((color, weight), &cluster) in points.iter().zip(&assignment) {
                let w = f64::from(*weight);
                for c in 0..3 {
                    sums[cluster][c] += f64::from(color[c]) * w;
                }
                weights[cluster] += w;
            }

            let mut shift = 0.0f32;
            for (i, center) in centers.iter_mut().enumerate() {
                // Empty clusters keep their previous center.
                if weights[i] == 0.0 {
                    continue;
                }
                let updated = [
                    (sums[i][0] / weights[i]) as f32,
                    (sums[i][1] / weights[i]) as f32,
                    (sums[i][2] / weights[i]) as f32,
                ];
                shift = shift.max(dist_sq(*center, updated).sqrt());
                *center = updated;
            }

            if shift <= self.epsilon {
                break;
            }
        }

        assign(&points, &centers, &mut assignment);
        let compactness = points
            .iter()
            .zip(&assignment)
            .map(|((color, weight), &cluster)| {
                f64::from(*weight) * f64::from(dist_sq(*color, centers[cluster]))
            })
            .sum();

        (centers, compactness)
    }
}

impl Quantize for KMeansQuantizer {
    fn quantize(&self, image: &RgbImage, colors: usize) -> Result<Quantized, ProcessingError> {
        let k = check_request(image, colors)?;
        let (width, height) = image.dimensions();
        let histogram = ColorHistogram::from_image(image);

        // Nothing to cluster: keep the image's own colors.
        if histogram.len() <= k {
            let palette = Palette::new(histogram.iter().map(|(c, _)| c).collect());
            let entry_labels: Vec<u8> = (0..histogram.len()).map(|i| i as u8).collect();
            return Ok(Quantized {
                palette,
                labels: label_pixels(image, &histogram, &entry_labels),
                width,
                height,
            });
        }

        let step = training_step(width, height);
        let training = if step > 1 {
            ColorHistogram::sampled(image, step)
        } else {
            histogram.clone()
        };

        let mut rng = self.rng();
        let mut best: Option<(Vec<Center>, f64)> = None;
        for attempt in 0..self.attempts {
            let (centers, compactness) = self.attempt(&training, k, &mut rng);
            tracing::trace!(attempt, compactness, "k-means attempt");
            if best.as_ref().map_or(true, |(_, c)| compactness < *c) {
                best = Some((centers, compactness));
            }
        }
        let Some((centers, compactness)) = best else {
            return Err(ProcessingError::Transform {
                stage: "quantize",
                reason: "k-means produced no centers".to_string(),
            });
        };

        let palette = Palette::new(centers.iter().map(|&c| to_u8(c)).collect());
        let entry_labels: Vec<u8> = histogram
            .iter()
            .map(|(color, _)| nearest_center(&centers, to_f32(color)) as u8)
            .collect();
        let labels = label_pixels(image, &histogram, &entry_labels);
        let labels = majority_filter(&labels, width, height);

        tracing::debug!(
            k,
            palette_size = palette.distinct_len(),
            distinct_input = histogram.len(),
            training_step = step,
            compactness,
            "k-means quantization"
        );

        Ok(Quantized {
            palette,
            labels,
            width,
            height,
        })
    }
}

fn training_step(width: u32, height: u32) -> u32 {
    let pixels = u64::from(width) * u64::from(height);
    let ratio = pixels as f64 / f64::from(MAX_TRAINING_PIXELS);
    if ratio <= 1.0 {
        1
    } else {
        ratio.sqrt().ceil() as u32
    }
}

/// Weighted k-means++ seeding. May return fewer than `k` centers when the
/// points run out of distinct positions.
fn seed_plus_plus(points: &[(Center, f32)], k: usize, rng: &mut StdRng) -> Vec<Center> {
    let mut centers = Vec::with_capacity(k);
    if points.is_empty() {
        return centers;
    }

    let weights: Vec<f64> = points.iter().map(|(_, w)| f64::from(*w)).collect();
    let first = pick_weighted(&weights, rng).unwrap_or(0);
    centers.push(points[first].0);

    let mut nearest: Vec<f64> = points
        .iter()
        .map(|(c, _)| f64::from(dist_sq(*c, centers[0])))
        .collect();

    while centers.len() < k {
        let scores: Vec<f64> = nearest
            .iter()
            .zip(&weights)
            .map(|(d, w)| d * w)
            .collect();
        let Some(next) = pick_weighted(&scores, rng) else {
            break;
        };
        let center = points[next].0;
        centers.push(center);
        for (d, (c, _)) in nearest.iter_mut().zip(points) {
            *d = d.min(f64::from(dist_sq(*c, center)));
        }
    }
    centers
}

/// Draw an index with probability proportional to its score. `None` when
/// every score is zero.
fn pick_weighted(scores: &[f64], rng: &mut StdRng) -> Option<usize> {
    let total: f64 = scores.iter().sum();
    if total <= 0.0 {
        return None;
    }
    let mut target = rng.gen::<f64>() * total;
    for (i, &s) in scores.iter().enumerate() {
        if s <= 0.0 {
            continue;
        }
        if target < s {
            return Some(i);
        }
        target -= s;
    }
    scores.iter().rposition(|&s| s > 0.0)
}

fn assign(points: &[(Center, f32)], centers: &[Center], assignment: &mut [usize]) {
    for ((color, _), slot) in points.iter().zip(assignment.iter_mut()) {
        *slot = nearest_center(centers, *color);
    }
}

fn nearest_center(centers: &[Center], color: Center) -> usize {
    let mut best = 0;
    let mut best_dist = f32::MAX;
    for (i, c) in centers.iter().enumerate() {
        let d = dist_sq(*c, color);
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

#[inline]
fn dist_sq(a: Center, b: Center) -> f32 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr * dr + dg * dg + db * db
}

#[inline]
fn to_f32(c: [u8; 3]) -> Center {
    [f32::from(c[0]), f32::from(c[1]), f32::from(c[2])]
}

#[inline]
fn to_u8(c: Center) -> [u8; 3] {
    [
        c[0].round().clamp(0.0, 255.0) as u8,
        c[1].round().clamp(0.0, 255.0) as u8,
        c[2].round().clamp(0.0, 255.0) as u8,
    ]
}
