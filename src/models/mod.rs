pub mod config;
pub mod params;

pub use config::{AppConfig, DEFAULT_MAX_UPLOAD_BYTES};
pub use params::RequestParams;
