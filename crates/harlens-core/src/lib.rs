pub mod analysis;
pub mod analyzer;
pub mod config;
pub mod dataset;
pub mod error;
pub mod har;
pub mod memory;
pub mod validate;

pub use analyzer::{Analysis, HarAnalyzer};
pub use error::{Error, Result};
