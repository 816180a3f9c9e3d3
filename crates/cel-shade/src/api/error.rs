//! Unified error type for the cel-shade public API.
//!
//! [`CartoonError`] separates problems with the *input* (nothing usable was
//! supplied) from problems during *processing* (the input decoded but a
//! transform or the final encode failed). Callers serving requests use
//! [`CartoonError::is_input`] to decide between a client-facing and a
//! server-facing failure.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias for pipeline operations.
pub type Result<T> = std::result::Result<T, CartoonError>;

/// Top-level pipeline error.
#[derive(Debug, Error)]
pub enum CartoonError {
    /// The source image is missing, unreadable or undecodable.
    #[error(transparent)]
    Input(#[from] InputError),

    /// A configuration value could not be applied.
    ///
    /// Every configuration field is clamped on entry, so the pipeline never
    /// produces this variant; it exists for callers that validate strictly.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A transform or the final encode failed.
    #[error(transparent)]
    Processing(#[from] ProcessingError),
}

impl CartoonError {
    /// True when the failure was caused by the supplied image.
    pub fn is_input(&self) -> bool {
        matches!(self, CartoonError::Input(_))
    }
}

/// Problems with the source image.
#[derive(Debug, Error)]
pub enum InputError {
    /// Zero bytes were supplied.
    #[error("input is empty")]
    Empty,

    /// The source path does not exist.
    #[error("input not found: {}", path.display())]
    Missing { path: PathBuf },

    /// The source path exists but could not be read.
    #[error("failed to read input {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bytes are not in a recognised image format.
    #[error("unrecognised image format")]
    UnsupportedFormat,

    /// The bytes looked like an image but decoding failed.
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    /// The image decoded to zero pixels.
    #[error("image has no pixels ({width}x{height})")]
    ZeroSize { width: u32, height: u32 },
}

/// Failures after the input decoded successfully.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// Two buffers that must share dimensions did not.
    #[error("{stage}: dimension mismatch, expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        stage: &'static str,
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// A transform stage failed.
    #[error("{stage} failed: {reason}")]
    Transform { stage: &'static str, reason: String },

    /// PNG encoding of the final image failed.
    #[error("failed to encode output: {0}")]
    Encode(#[source] image::ImageError),
}
