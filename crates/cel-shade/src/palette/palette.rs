use image::Rgb;

/// Ordered set of cel colors produced by a quantizer.
///
/// Entries are in the order the quantizer emitted them; pixel labels index
/// into this order. Duplicate entries are allowed (k-means can converge two
/// clusters onto one color), so [`Palette::distinct_len`] may be smaller
/// than [`Palette::len`].
///
/// # Example
///
/// ```
/// use cel_shade::Palette;
///
/// let palette = Palette::new(vec![[0, 0, 0], [255, 255, 255]]);
/// assert_eq!(palette.len(), 2);
/// assert_eq!(palette.nearest([200, 210, 220]), 1);
/// assert_eq!(palette.to_hex(), vec!["#000000", "#ffffff"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<[u8; 3]>,
}

impl Palette {
    pub fn new(colors: Vec<[u8; 3]>) -> Self {
        Self { colors }
    }

    /// Number of entries, counting duplicates.
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color at `idx` as an image pixel.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len()`.
    #[inline]
    pub fn get(&self, idx: usize) -> Rgb<u8> {
        Rgb(self.colors[idx])
    }

    #[inline]
    pub fn colors(&self) -> &[[u8; 3]] {
        &self.colors
    }

    pub fn iter(&self) -> impl Iterator<Item = Rgb<u8>> + '_ {
        self.colors.iter().map(|&c| Rgb(c))
    }

    /// Index of the entry closest to `color` (squared Euclidean RGB).
    /// Ties resolve to the lower index. Returns 0 for an empty palette.
    pub fn nearest(&self, color: [u8; 3]) -> usize {
        let mut best_idx = 0;
        let mut best_dist = u32::MAX;
        for (i, entry) in self.colors.iter().enumerate() {
            let dist = distance_sq(*entry, color);
            if dist < best_dist {
                best_dist = dist;
                best_idx = i;
            }
        }
        best_idx
    }

    /// Number of distinct colors.
    pub fn distinct_len(&self) -> usize {
        let mut sorted = self.colors.clone();
        sorted.sort_unstable();
        sorted.dedup();
        sorted.len()
    }

    /// Entries as lowercase `#rrggbb` strings.
    pub fn to_hex(&self) -> Vec<String> {
        self.colors
            .iter()
            .map(|[r, g, b]| format!("#{r:02x}{g:02x}{b:02x}"))
            .collect()
    }
}

/// Squared Euclidean distance between two RGB triples.
#[inline]
pub fn distance_sq(a: [u8; 3], b: [u8; 3]) -> u32 {
    let dr = i32::from(a[0]) - i32::from(b[0]);
    let dg = i32::from(a[1]) - i32::from(b[1]);
    let db = i32::from(a[2]) - i32::from(b[2]);
    (dr * dr + dg * dg + db * db) as u32
}
