//! Compositing, tone mapping and encoding.
//!
//! The compositor is where the two pipeline branches meet: the restored
//! quantized color layer and the full-resolution edge mask must share
//! dimensions, otherwise [`composite`] fails with
//! [`ProcessingError::DimensionMismatch`](crate::ProcessingError).

mod composite;
mod encode;

pub use composite::{composite, tone_map, COLOR_WEIGHT, EDGE_WEIGHT};
pub use encode::encode_png;
