//! Public API for the cel-shade crate.
//!
//! This module provides the high-level API: the [`Cartoonifier`] builder,
//! the [`Rendering`] it returns and the unified [`CartoonError`] type.

mod builder;
mod error;
mod rendering;

pub use builder::{cartoonify, Cartoonifier};
pub use error::{CartoonError, InputError, ProcessingError, Result};
pub use rendering::{EdgeOutcome, Rendering};
