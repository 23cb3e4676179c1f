//! Subcommand implementations.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use bioactivity_common::Config;
use bioactivity_descriptors::input::parse_upload;
use bioactivity_descriptors::padel::java_available;
use bioactivity_pipeline::PredictionPipeline;

use crate::cli::PredictArgs;

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::from_path(path)?,
        None => Config::load()?,
    };
    Ok(config)
}

pub async fn run_predict(config: &Config, args: &PredictArgs) -> Result<()> {
    let bytes = std::fs::read(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let records = parse_upload(&bytes)?;
    info!("Read {} molecules from {}", records.len(), args.input.display());

    let pipeline = PredictionPipeline::from_config(config)?;
    let run = pipeline.run(&records).await?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| config.resolve(Path::new(&run.export.file_name)));
    std::fs::write(&output, run.export.to_csv()?)
        .with_context(|| format!("writing {}", output.display()))?;

    println!("{:<24} {:>10}", run.export.identifier_column, run.export.score_column);
    for record in &run.export.records {
        println!("{:<24} {:>10.4}", record.identifier, record.score);
    }
    println!(
        "\n{} predictions written to {} (descriptors {}, subset {})",
        run.export.len(),
        output.display(),
        run.descriptors.shape,
        run.features.shape()
    );
    Ok(())
}

pub async fn run_check(config: &Config) -> Result<()> {
    let pipeline = PredictionPipeline::from_config(config)?;
    println!("model:        {}", config.model_path().display());
    println!("feature list: {} ({} features)", config.feature_list_path().display(), pipeline.reference().len());

    pipeline.preflight()?;
    println!("PaDEL jar:    {}", config.jar_path().display());
    println!("fingerprints: {}", config.fingerprint_path().display());

    if !java_available(&config.descriptors.java).await {
        warn!("Java launcher {:?} did not respond to -version", config.descriptors.java);
        anyhow::bail!("Java launcher {:?} is not available", config.descriptors.java);
    }
    println!("java:         {}", config.descriptors.java);
    println!("All artifacts present.");
    Ok(())
}
