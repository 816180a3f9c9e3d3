//! Pipeline configuration.
//!
//! [`CartoonConfig`] is the single record that drives a pipeline run. Every
//! setter clamps its argument into the supported range; nothing here can
//! fail, so a caller passing user-supplied numbers never sees a
//! configuration error.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Smallest accepted `target_long_side`.
pub const MIN_LONG_SIDE: u32 = 256;
/// Largest accepted `target_long_side`.
pub const MAX_LONG_SIDE: u32 = 2048;
/// Hard cap on the working resolution used for smoothing and quantization.
pub const MAX_WORKING_LONG_SIDE: u32 = 1600;

/// Fewest palette entries a quantizer is asked for.
pub const MIN_COLORS: usize = 4;
/// Most palette entries a quantizer is asked for.
pub const MAX_COLORS: usize = 16;

/// Thinnest-line end of the `line_strength` range.
pub const MIN_LINE_STRENGTH: f32 = 0.1;
/// Upper bound of `line_strength`.
pub const MAX_LINE_STRENGTH: f32 = 1.0;

const DEFAULT_LONG_SIDE: u32 = 1024;
const DEFAULT_COLORS: usize = 8;
const DEFAULT_LINE_STRENGTH: f32 = 0.5;

/// Smoothing strategy for the base color layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlurType {
    /// Two edge-aware bilateral passes followed by a 3x3 median.
    #[default]
    Bilateral,
    /// A single median (rank) filter.
    Median,
    /// A single Gaussian blur.
    Gaussian,
}

impl BlurType {
    pub fn as_str(self) -> &'static str {
        match self {
            BlurType::Bilateral => "bilateral",
            BlurType::Median => "median",
            BlurType::Gaussian => "gaussian",
        }
    }
}

impl fmt::Display for BlurType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a name does not match any known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

impl FromStr for BlurType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bilateral" => Ok(BlurType::Bilateral),
            "median" => Ok(BlurType::Median),
            "gaussian" => Ok(BlurType::Gaussian),
            other => Err(UnknownVariant {
                kind: "blur type",
                value: other.to_string(),
            }),
        }
    }
}

/// Palette reduction algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QuantizerKind {
    /// Best-of-N k-means clustering. Palette may differ between runs.
    #[default]
    #[serde(rename = "kmeans", alias = "k-means", alias = "k_means")]
    KMeans,
    /// Deterministic median-cut over the color histogram.
    #[serde(rename = "mediancut", alias = "median-cut", alias = "median_cut")]
    MedianCut,
}

impl QuantizerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            QuantizerKind::KMeans => "kmeans",
            QuantizerKind::MedianCut => "mediancut",
        }
    }
}

impl fmt::Display for QuantizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuantizerKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kmeans" | "k-means" | "k_means" => Ok(QuantizerKind::KMeans),
            "mediancut" | "median-cut" | "median_cut" => Ok(QuantizerKind::MedianCut),
            other => Err(UnknownVariant {
                kind: "quantizer",
                value: other.to_string(),
            }),
        }
    }
}

/// Configuration for one pipeline run.
///
/// # Defaults
///
/// - `target_long_side`: 1024 (clamped to 256..=2048)
/// - `num_colors`: 8 (clamped to 4..=16)
/// - `line_strength`: 0.5 (clamped to 0.1..=1.0)
/// - `blur_type`: [`BlurType::Bilateral`]
/// - `upscale_small`: true
/// - `quantizer`: [`QuantizerKind::KMeans`]
/// - `seed`: None (k-means seeds from entropy)
///
/// Fields are public so a config can be deserialized or written as a
/// literal; [`Cartoonifier`](crate::Cartoonifier) re-clamps on entry, so an
/// out-of-range literal is corrected rather than trusted.
///
/// # Example
///
/// ```
/// use cel_shade::{BlurType, CartoonConfig};
///
/// let config = CartoonConfig::new()
///     .num_colors(99)
///     .line_strength(0.0)
///     .blur_type(BlurType::Median);
///
/// assert_eq!(config.num_colors, 16);
/// assert!((config.line_strength - 0.1).abs() < f32::EPSILON);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartoonConfig {
    /// Requested long side of the working copy, in pixels.
    pub target_long_side: u32,
    /// Requested palette size.
    pub num_colors: usize,
    /// Line weight; higher values give thinner, crisper ink.
    pub line_strength: f32,
    /// Base-layer smoothing strategy.
    pub blur_type: BlurType,
    /// Enlarge inputs whose short side is below 512 px.
    pub upscale_small: bool,
    /// Palette reduction algorithm.
    pub quantizer: QuantizerKind,
    /// Fixed RNG seed for k-means; `None` draws from entropy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for CartoonConfig {
    fn default() -> Self {
        Self {
            target_long_side: DEFAULT_LONG_SIDE,
            num_colors: DEFAULT_COLORS,
            line_strength: DEFAULT_LINE_STRENGTH,
            blur_type: BlurType::default(),
            upscale_small: true,
            quantizer: QuantizerKind::default(),
            seed: None,
        }
    }
}

impl CartoonConfig {
    /// Create a configuration with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target long side. Values outside 256..=2048 are clamped.
    #[inline]
    pub fn target_long_side(mut self, pixels: i64) -> Self {
        self.target_long_side = clamp_long_side(pixels);
        self
    }

    /// Set the palette size. Values outside 4..=16 are clamped.
    #[inline]
    pub fn num_colors(mut self, colors: i64) -> Self {
        self.num_colors = clamp_colors(colors);
        self
    }

    /// Set the line strength. Values outside 0.1..=1.0 are clamped; NaN
    /// keeps the default.
    #[inline]
    pub fn line_strength(mut self, strength: f32) -> Self {
        self.line_strength = clamp_line_strength(strength);
        self
    }

    #[inline]
    pub fn blur_type(mut self, blur_type: BlurType) -> Self {
        self.blur_type = blur_type;
        self
    }

    #[inline]
    pub fn upscale_small(mut self, enabled: bool) -> Self {
        self.upscale_small = enabled;
        self
    }

    #[inline]
    pub fn quantizer(mut self, quantizer: QuantizerKind) -> Self {
        self.quantizer = quantizer;
        self
    }

    /// Fix the k-means RNG seed, making k-means runs reproducible.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Return a copy with every numeric field forced into range.
    pub fn clamped(self) -> Self {
        Self {
            target_long_side: clamp_long_side(i64::from(self.target_long_side)),
            num_colors: clamp_colors(i64::try_from(self.num_colors).unwrap_or(i64::MAX)),
            line_strength: clamp_line_strength(self.line_strength),
            ..self
        }
    }

    /// Long side of the working copy: the target, capped at 1600 px.
    #[inline]
    pub fn working_long_side(&self) -> u32 {
        clamp_long_side(i64::from(self.target_long_side)).min(MAX_WORKING_LONG_SIDE)
    }
}

/// Clamp a requested long side into 256..=2048.
pub fn clamp_long_side(pixels: i64) -> u32 {
    pixels.clamp(i64::from(MIN_LONG_SIDE), i64::from(MAX_LONG_SIDE)) as u32
}

/// Clamp a requested palette size into 4..=16.
pub fn clamp_colors(colors: i64) -> usize {
    colors.clamp(MIN_COLORS as i64, MAX_COLORS as i64) as usize
}

/// Clamp a line strength into 0.1..=1.0. NaN maps to the default.
pub fn clamp_line_strength(strength: f32) -> f32 {
    if strength.is_nan() {
        return DEFAULT_LINE_STRENGTH;
    }
    strength.clamp(MIN_LINE_STRENGTH, MAX_LINE_STRENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = CartoonConfig::default();
        assert_eq!(config.target_long_side, 1024);
        assert_eq!(config.num_colors, 8);
        assert!((config.line_strength - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.blur_type, BlurType::Bilateral);
        assert!(config.upscale_small);
        assert_eq!(config.quantizer, QuantizerKind::KMeans);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_num_colors_clamped() {
        assert_eq!(CartoonConfig::new().num_colors(99).num_colors, 16);
        assert_eq!(CartoonConfig::new().num_colors(0).num_colors, 4);
        assert_eq!(CartoonConfig::new().num_colors(-7).num_colors, 4);
        assert_eq!(CartoonConfig::new().num_colors(12).num_colors, 12);
    }

    #[test]
    fn test_line_strength_clamped() {
        let low = CartoonConfig::new().line_strength(-3.0);
        assert!((low.line_strength - 0.1).abs() < f32::EPSILON);

        let high = CartoonConfig::new().line_strength(7.5);
        assert!((high.line_strength - 1.0).abs() < f32::EPSILON);

        let inf = CartoonConfig::new().line_strength(f32::INFINITY);
        assert!((inf.line_strength - 1.0).abs() < f32::EPSILON);

        let nan = CartoonConfig::new().line_strength(f32::NAN);
        assert!((nan.line_strength - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_target_long_side_clamped() {
        assert_eq!(CartoonConfig::new().target_long_side(10).target_long_side, 256);
        assert_eq!(
            CartoonConfig::new().target_long_side(100_000).target_long_side,
            2048
        );
    }

    #[test]
    fn test_working_long_side_capped_at_1600() {
        let config = CartoonConfig::new().target_long_side(2048);
        assert_eq!(config.working_long_side(), 1600);

        let config = CartoonConfig::new().target_long_side(800);
        assert_eq!(config.working_long_side(), 800);
    }

    #[test]
    fn test_clamped_fixes_struct_literal() {
        let config = CartoonConfig {
            target_long_side: 5,
            num_colors: 1000,
            line_strength: 3.0,
            ..Default::default()
        }
        .clamped();

        assert_eq!(config.target_long_side, 256);
        assert_eq!(config.num_colors, 16);
        assert!((config.line_strength - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_blur_type_from_str() {
        assert_eq!("bilateral".parse::<BlurType>(), Ok(BlurType::Bilateral));
        assert_eq!(" Median ".parse::<BlurType>(), Ok(BlurType::Median));
        assert_eq!("GAUSSIAN".parse::<BlurType>(), Ok(BlurType::Gaussian));
        assert!("box".parse::<BlurType>().is_err());
    }

    #[test]
    fn test_quantizer_from_str_aliases() {
        for name in ["kmeans", "k-means", "K_Means"] {
            assert_eq!(name.parse::<QuantizerKind>(), Ok(QuantizerKind::KMeans));
        }
        for name in ["mediancut", "median-cut", "median_cut"] {
            assert_eq!(name.parse::<QuantizerKind>(), Ok(QuantizerKind::MedianCut));
        }
        let err = "octree".parse::<QuantizerKind>().unwrap_err();
        assert_eq!(err.to_string(), "unknown quantizer: octree");
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        assert_eq!(
            QuantizerKind::MedianCut.to_string().parse::<QuantizerKind>(),
            Ok(QuantizerKind::MedianCut)
        );
        assert_eq!(BlurType::Gaussian.to_string(), "gaussian");
    }
}
