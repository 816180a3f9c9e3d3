//! Cartoonify
//!
//! Upload service and CLI around the `cel-shade` pipeline.
//! This library exposes modules for integration testing.

pub mod api;
pub mod error;
pub mod models;
pub mod server;
pub mod services;
