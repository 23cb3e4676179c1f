//! Batch bioactivity prediction from the command line.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use crate::cli::{Cli, Command};
use crate::commands::{load_config, run_check, run_predict};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let result = match load_config(cli.config.as_deref()) {
        Ok(config) => match &cli.command {
            Command::Predict(args) => run_predict(&config, args).await,
            Command::Check => run_check(&config).await,
        },
        Err(e) => Err(e),
    };

    if let Err(error) = result {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}
