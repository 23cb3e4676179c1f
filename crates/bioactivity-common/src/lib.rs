//! bioactivity-common: Shared types, errors, and configuration used across all
//! bioactivity crates.

pub mod error;
pub mod records;
pub mod config;

// Re-export commonly used types
pub use error::{BioactivityError, Result};
pub use records::{InputRecord, PredictionRecord, Shape};
pub use config::Config;
