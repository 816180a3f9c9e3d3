//! Decoding source images into canonical RGB buffers.
//!
//! The loader is the only stage that touches encoded bytes. It guarantees
//! that whatever leaves it is an 8-bit, 3-channel [`RgbImage`] whose pixel
//! grid matches the intended visual orientation:
//!
//! 1. **Format sniffing** from the leading bytes (PNG, JPEG, WebP)
//! 2. **EXIF orientation** applied (rotations and mirror flips)
//! 3. **Alpha flattening** over opaque white, so transparent edges do not
//!    turn into dark halos once the alpha channel is dropped

mod loader;

pub use loader::{flatten_alpha, load_bytes, load_path};
