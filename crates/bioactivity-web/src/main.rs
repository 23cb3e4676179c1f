//! Bioactivity prediction web server.
//!
//! Run with: cargo run -p bioactivity-web

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use bioactivity_common::Config;
use bioactivity_descriptors::padel::java_available;
use bioactivity_pipeline::PredictionPipeline;
use bioactivity_web::{router::build_router, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting bioactivity prediction server...");

    let config = Config::load().context("loading configuration")?;

    // Model and feature list are required; refuse to start without them.
    let pipeline = PredictionPipeline::from_config(&config).context("loading model artifacts")?;

    // Tool artifacts are reported per request when missing.
    if let Err(e) = pipeline.preflight() {
        warn!("{}; predictions will fail until this is fixed", e);
    }
    if !java_available(&config.descriptors.java).await {
        warn!("Java launcher {:?} not found, PaDEL-Descriptor cannot run", config.descriptors.java);
    }

    let addr = config.bind_addr();
    let app = build_router(AppState::new(config, pipeline));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
