//! Palette type shared by the quantizers and the rendering result.

mod palette;

pub use palette::{distance_sq, Palette};
