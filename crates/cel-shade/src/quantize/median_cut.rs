//! Median-cut quantization.
//!
//! Starts with one bucket holding the whole color histogram and repeatedly
//! splits the bucket whose widest channel spans the largest range. The
//! split point is the pixel-weighted median along that channel. Each final
//! bucket contributes its weighted mean color to the palette.
//!
//! Every step is a pure function of the histogram, and ties are resolved
//! by bucket order and color order, so identical inputs always produce
//! identical palettes and label maps.

use image::RgbImage;

use super::histogram::ColorHistogram;
use super::{check_request, label_pixels, Quantize, Quantized};
use crate::api::ProcessingError;
use crate::palette::Palette;

/// Deterministic median-cut quantizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MedianCutQuantizer;

/// A bucket is a list of histogram entry indices.
struct Bucket {
    entries: Vec<usize>,
}

impl Bucket {
    /// Widest channel and its range.
    fn widest_channel(&self, hist: &ColorHistogram) -> (usize, u8) {
        let mut lo = [u8::MAX; 3];
        let mut hi = [u8::MIN; 3];
        for &idx in &self.entries {
            let color = hist.color(idx);
            for c in 0..3 {
                lo[c] = lo[c].min(color[c]);
                hi[c] = hi[c].max(color[c]);
            }
        }
        let mut best = (0, 0);
        for c in 0..3 {
            let range = hi[c] - lo[c];
            if range > best.1 {
                best = (c, range);
            }
        }
        best
    }

    /// Split at the weighted median of `channel`. Both halves are non-empty.
    fn split(mut self, hist: &ColorHistogram, channel: usize) -> (Bucket, Bucket) {
        self.entries
            .sort_by_key(|&idx| (hist.color(idx)[channel], hist.color(idx)));

        let total: u64 = self.entries.iter().map(|&i| u64::from(hist.count(i))).sum();
        let half = total.div_ceil(2);
        let mut running = 0u64;
        let mut cut = self.entries.len() - 1;
        for (pos, &idx) in self.entries.iter().enumerate() {
            running += u64::from(hist.count(idx));
            if running >= half {
                cut = pos + 1;
                break;
            }
        }
        let cut = cut.clamp(1, self.entries.len() - 1);

        let upper = self.entries.split_off(cut);
        (self, Bucket { entries: upper })
    }

    fn mean(&self, hist: &ColorHistogram) -> [u8; 3] {
        let mut sums = [0u64; 3];
        let mut total = 0u64;
        for &idx in &self.entries {
            let color = hist.color(idx);
            let n = u64::from(hist.count(idx));
            for c in 0..3 {
                sums[c] += u64::from(color[c]) * n;
            }
            total += n;
        }
        let total = total.max(1);
        [
            ((sums[0] + total / 2) / total) as u8,
            ((sums[1] + total / 2) / total) as u8,
            ((sums[2] + total / 2) / total) as u8,
        ]
    }
}

impl Quantize for MedianCutQuantizer {
    fn quantize(&self, image: &RgbImage, colors: usize) -> Result<Quantized, ProcessingError> {
        let k = check_request(image, colors)?;
        let (width, height) = image.dimensions();
        let hist = ColorHistogram::from_image(image);

        let mut buckets = vec![Bucket {
            entries: (0..hist.len()).collect(),
        }];

        while buckets.len() < k {
            // Largest range wins; the earliest bucket wins ties.
            let mut target: Option<(usize, usize, u8)> = None;
            for (i, bucket) in buckets.iter().enumerate() {
                if bucket.entries.len() < 2 {
                    continue;
                }
                let (channel, range) = bucket.widest_channel(&hist);
                if target.map_or(true, |(_, _, best)| range > best) {
                    target = Some((i, channel, range));
                }
            }
            let Some((i, channel, _)) = target else {
                break;
            };

            let bucket = buckets.remove(i);
            let (lower, upper) = bucket.split(&hist, channel);
            buckets.insert(i, upper);
            buckets.insert(i, lower);
        }

        let mut entry_labels = vec![0u8; hist.len()];
        for (label, bucket) in buckets.iter().enumerate() {
            for &idx in &bucket.entries {
                entry_labels[idx] = label as u8;
            }
        }
        let palette = Palette::new(buckets.iter().map(|b| b.mean(&hist)).collect());

        tracing::debug!(
            k,
            buckets = buckets.len(),
            distinct_input = hist.len(),
            "median-cut quantization"
        );

        Ok(Quantized {
            palette,
            labels: label_pixels(image, &hist, &entry_labels),
            width,
            height,
        })
    }
}
