use cel_shade::CartoonConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default upload ceiling: 20 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Application configuration loaded from config.yaml
///
/// ```yaml
/// output_dir: static/processed
/// max_upload_bytes: 20971520
/// defaults:
///   num_colors: 10
///   blur_type: median
///   quantizer: mediancut
/// ```
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Where produced PNGs are written and served from
    pub output_dir: PathBuf,

    /// Largest accepted upload, in bytes
    pub max_upload_bytes: usize,

    /// Pipeline settings used when a request leaves a parameter out
    pub defaults: CartoonConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("static/processed"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            defaults: CartoonConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file, falling back to defaults when
    /// no path is given or the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            tracing::info!("No config file set, using defaults");
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_yaml(&content) {
                Ok(config) => {
                    tracing::info!(
                        path = %path.display(),
                        output_dir = %config.output_dir.display(),
                        max_upload_bytes = config.max_upload_bytes,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, path = %path.display(), "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Parse YAML. Pipeline defaults are clamped into range.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        let config: Self = serde_yaml::from_str(content)?;
        Ok(Self {
            defaults: config.defaults.clamped(),
            ..config
        })
    }

    /// Replace the output directory (e.g. from `OUTPUT_DIR`).
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }
}
