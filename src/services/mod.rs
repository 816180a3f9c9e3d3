pub mod cartoon_service;
pub mod output_store;

pub use cartoon_service::{CartoonOutcome, CartoonService};
pub use output_store::OutputStore;
