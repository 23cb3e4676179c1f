//! bioactivity-pipeline: runs one prediction request end to end:
//! upload → PaDEL descriptors → reference-column projection → model → export.

pub mod export;
pub mod pipeline;

pub use export::PredictionExport;
pub use pipeline::{PredictionPipeline, PredictionRun};
