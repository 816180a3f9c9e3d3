use image::RgbImage;

/// Distinct colors of an image with their pixel counts, sorted by color.
///
/// Both quantizers work on this table instead of on raw pixels: clustering
/// a weighted color is equivalent to clustering each pixel carrying it, and
/// a smoothed photo has far fewer distinct colors than pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorHistogram {
    keys: Vec<u32>,
    counts: Vec<u32>,
}

impl ColorHistogram {
    pub fn from_image(image: &RgbImage) -> Self {
        Self::from_packed(image.pixels().map(|p| pack(p.0)).collect())
    }

    /// Histogram of every `step`-th pixel in both directions.
    pub fn sampled(image: &RgbImage, step: u32) -> Self {
        let step = step.max(1);
        let mut packed = Vec::new();
        for y in (0..image.height()).step_by(step as usize) {
            for x in (0..image.width()).step_by(step as usize) {
                packed.push(pack(image.get_pixel(x, y).0));
            }
        }
        Self::from_packed(packed)
    }

    fn from_packed(mut packed: Vec<u32>) -> Self {
        packed.sort_unstable();
        let mut keys = Vec::new();
        let mut counts: Vec<u32> = Vec::new();
        for key in packed {
            match keys.last() {
                Some(&last) if last == key => {
                    if let Some(count) = counts.last_mut() {
                        *count += 1;
                    }
                }
                _ => {
                    keys.push(key);
                    counts.push(1);
                }
            }
        }
        Self { keys, counts }
    }

    /// Number of distinct colors.
    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Total pixel count.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| u64::from(c)).sum()
    }

    #[inline]
    pub fn color(&self, idx: usize) -> [u8; 3] {
        unpack(self.keys[idx])
    }

    #[inline]
    pub fn count(&self, idx: usize) -> u32 {
        self.counts[idx]
    }

    /// `(color, count)` pairs in ascending color order.
    pub fn iter(&self) -> impl Iterator<Item = ([u8; 3], u32)> + '_ {
        self.keys
            .iter()
            .zip(&self.counts)
            .map(|(&k, &c)| (unpack(k), c))
    }

    /// Position of `color` in the table.
    #[inline]
    pub fn index_of(&self, color: [u8; 3]) -> Option<usize> {
        self.keys.binary_search(&pack(color)).ok()
    }
}

#[inline]
fn pack(c: [u8; 3]) -> u32 {
    (u32::from(c[0]) << 16) | (u32::from(c[1]) << 8) | u32::from(c[2])
}

#[inline]
fn unpack(v: u32) -> [u8; 3] {
    [(v >> 16) as u8, (v >> 8) as u8, v as u8]
}
