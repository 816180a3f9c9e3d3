use cel_shade::options::{clamp_colors, clamp_line_strength, clamp_long_side};
use cel_shade::{BlurType, CartoonConfig, QuantizerKind};
use serde::Deserialize;
use utoipa::ToSchema;

/// Pipeline parameters as they arrive from a form or query string.
///
/// Every field is optional and kept as raw text. Parsing happens in
/// [`RequestParams::into_config`], where each field falls back to the
/// configured default independently of the others.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RequestParams {
    /// bilateral | median | gaussian
    #[schema(example = "bilateral")]
    pub blur_type: Option<String>,
    /// Palette size, clamped to 4..=16
    #[schema(example = "8")]
    pub num_colors: Option<String>,
    /// Line weight, clamped to 0.1..=1.0
    #[schema(example = "0.5")]
    pub line_strength: Option<String>,
    /// Working resolution, clamped to 256..=2048
    #[schema(example = "1024")]
    pub target_long_side: Option<String>,
    /// true/false, 1/0, yes/no, on/off
    #[schema(example = "true")]
    pub upscale_small: Option<String>,
    /// kmeans | mediancut
    #[schema(example = "kmeans")]
    pub quantizer: Option<String>,
    /// Fixed k-means seed
    pub seed: Option<String>,
}

impl RequestParams {
    /// Store a named form field. Returns false for names that are not
    /// pipeline parameters.
    pub fn set(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "blur_type" => &mut self.blur_type,
            "num_colors" => &mut self.num_colors,
            "line_strength" => &mut self.line_strength,
            "target_long_side" => &mut self.target_long_side,
            "upscale_small" => &mut self.upscale_small,
            "quantizer" => &mut self.quantizer,
            "seed" => &mut self.seed,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Build a pipeline configuration. Malformed values keep the default.
    pub fn into_config(self, defaults: &CartoonConfig) -> CartoonConfig {
        let mut config = defaults.clone();

        let blur_type = self.blur_type.as_deref();
        if let Some(v) = parse_lenient("blur_type", blur_type, |s| s.parse::<BlurType>().ok()) {
            config.blur_type = v;
        }
        if let Some(v) = parse_lenient("num_colors", self.num_colors.as_deref(), parse_int) {
            config.num_colors = clamp_colors(v);
        }
        if let Some(v) = parse_lenient("line_strength", self.line_strength.as_deref(), parse_float)
        {
            config.line_strength = clamp_line_strength(v);
        }
        if let Some(v) =
            parse_lenient("target_long_side", self.target_long_side.as_deref(), parse_int)
        {
            config.target_long_side = clamp_long_side(v);
        }
        if let Some(v) = parse_lenient("upscale_small", self.upscale_small.as_deref(), parse_bool)
        {
            config.upscale_small = v;
        }
        let quantizer = self.quantizer.as_deref();
        if let Some(v) = parse_lenient("quantizer", quantizer, |s| s.parse::<QuantizerKind>().ok()) {
            config.quantizer = v;
        }
        if let Some(v) = parse_lenient("seed", self.seed.as_deref(), |s| s.parse::<u64>().ok()) {
            config.seed = Some(v);
        }

        config
    }
}

fn parse_lenient<T>(
    name: &str,
    raw: Option<&str>,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    let parsed = parse(raw);
    if parsed.is_none() {
        tracing::debug!(param = name, value = raw, "Ignoring malformed parameter");
    }
    parsed
}

/// Integers, also accepting a float form such as "12.0".
fn parse_int(s: &str) -> Option<i64> {
    s.parse::<i64>().ok().or_else(|| {
        s.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| f.round() as i64)
    })
}

fn parse_float(s: &str) -> Option<f32> {
    s.parse::<f32>().ok().filter(|f| !f.is_nan())
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
