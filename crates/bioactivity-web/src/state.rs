//! Shared application state for the web server.

use std::sync::Arc;
use tokio::sync::Mutex;

use bioactivity_common::Config;
use bioactivity_pipeline::PredictionPipeline;

/// Shared state injected into every Axum handler.
pub struct AppState {
    pub config: Arc<Config>,
    pub pipeline: Arc<PredictionPipeline>,
    /// Held for the whole pipeline run: one JVM at a time.
    pub run_lock: Mutex<()>,
}

impl AppState {
    pub fn new(config: Config, pipeline: PredictionPipeline) -> Self {
        Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
            run_lock: Mutex::new(()),
        }
    }
}

pub type SharedState = Arc<AppState>;
