#![allow(clippy::needless_range_loop, clippy::manual_range_contains)]

//! cel-shade: turn photographs into flat-color, inked cartoon renderings
//!
//! This library implements a deterministic pixel pipeline that flattens a
//! photo into a small set of cel colors and draws line art over it.
//!
//! # Quick Start
//!
//! The [`Cartoonifier`] builder is the primary entry point:
//!
//! ```no_run
//! use cel_shade::{Cartoonifier, CartoonConfig, QuantizerKind};
//!
//! let config = CartoonConfig::new()
//!     .num_colors(6)
//!     .quantizer(QuantizerKind::MedianCut);
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let rendering = Cartoonifier::new(config).process_bytes(&bytes).unwrap();
//! let png = rendering.to_png().unwrap();
//! ```
//!
//! # Pipeline Overview
//!
//! ```text
//! bytes
//!   |
//!   v
//! [Loader]              decode, apply EXIF orientation, flatten alpha on white
//!   |
//!   v
//! [Upscaler]            short side < 512 → enlarge + unsharp mask (optional)
//!   |
//!   +-----------------------------+
//!   |                             |
//!   v                             v
//! [Long-side normalizer]        [Edge extractor]   full-resolution grayscale:
//!   |                             |                 median blur → Canny
//!   v                             |                 ∪ adaptive threshold
//! [Smoother]                      |                 → dilate → blur → invert
//!   |                             |
//!   v                             |
//! [Quantizer]                     |
//!   |                             |
//!   v                             |
//! restore to full resolution      |
//!   |                             |
//!   +--------------+--------------+
//!                  |
//!                  v
//!            [Compositor]       ink the flat colors with the edge mask
//!                  |
//!                  v
//!            [Tone mapper]      contrast, unsharp, light bilateral
//!                  |
//!                  v
//!              RgbImage  →  PNG
//! ```
//!
//! Smoothing and quantization run on a working copy whose long side is
//! bounded (see [`CartoonConfig::working_long_side`]); edges are extracted
//! from the full-resolution image so thin lines survive. The two branches
//! meet again at the compositor, which requires identical dimensions.
//!
//! # Quantizers
//!
//! Two interchangeable palette reducers are available through
//! [`QuantizerKind`]:
//!
//! - [`KMeansQuantizer`]: iterative clustering, best of several seeded
//!   attempts. Not reproducible across runs unless a seed is configured.
//! - [`MedianCutQuantizer`]: recursive median split of the color histogram.
//!   Fully deterministic.
//!
//! # Configuration
//!
//! Every field of [`CartoonConfig`] is clamped into its valid range rather
//! than rejected, so the pipeline never fails because of a bad parameter.
//!
//! # Errors
//!
//! [`CartoonError`] separates input problems (missing, unreadable or
//! undecodable source) from processing problems (transform or encode
//! failures). A run that succeeds but finds no lines is not an error; it is
//! reported through [`EdgeOutcome::Blank`] on the [`Rendering`].

pub mod api;
pub mod edges;
pub mod load;
pub mod options;
pub mod output;
pub mod palette;
pub mod preprocess;
pub mod quantize;
pub mod smooth;


pub use api::{
    cartoonify, CartoonError, Cartoonifier, EdgeOutcome, InputError, ProcessingError, Rendering,
    Result,
};
pub use edges::EdgeMask;
pub use options::{BlurType, CartoonConfig, QuantizerKind};
pub use palette::Palette;
pub use quantize::{KMeansQuantizer, MedianCutQuantizer, Quantize, Quantized, Quantizer};
