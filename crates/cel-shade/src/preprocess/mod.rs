//! Resolution handling ahead of the heavy stages.
//!
//! Two independent resizes run before smoothing and quantization:
//!
//! 1. **Adaptive upscale** (optional): inputs whose short side is below
//!    [`UPSCALE_FLOOR`] are enlarged with Catmull-Rom and sharpened with an
//!    unsharp mask to offset the interpolation softness. The result becomes
//!    the full-resolution reference the edge extractor and the final output
//!    use.
//! 2. **Long-side normalization**: a working copy is resized so its long
//!    side equals the configured working size. Area-style filtering when
//!    shrinking, Catmull-Rom when enlarging.
//!
//! After quantization the working copy is brought back to the reference
//! size with [`restore`], which uses nearest-neighbour sampling so flat
//! color regions stay flat.

mod resize;
mod sharpen;

pub use resize::{
    fit_long_side, normalize_long_side, restore, upscale_small, upscaled_dimensions,
    UPSCALE_FLOOR,
};
pub use sharpen::unsharp_mask;
