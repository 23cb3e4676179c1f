//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "bioactivity",
    version,
    about = "Predict pIC50 bioactivity from SMILES using PaDEL fingerprints and a trained model"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (default: $BIOACTIVITY_CONFIG or ./bioactivity.toml).
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the prediction pipeline on a structures file.
    Predict(PredictArgs),

    /// Validate configuration, model, feature list and descriptor tool.
    Check,
}

#[derive(Parser, Debug)]
pub struct PredictArgs {
    /// Whitespace-separated `SMILES identifier` file, no header.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Where to write the prediction CSV (default: export.file_name from config).
    #[arg(long, short, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_predict() {
        let cli = Cli::try_parse_from(["bioactivity", "predict", "molecules.txt", "-o", "out.csv"]).unwrap();
        match cli.command {
            Command::Predict(args) => {
                assert_eq!(args.input, PathBuf::from("molecules.txt"));
                assert_eq!(args.output, Some(PathBuf::from("out.csv")));
            }
            Command::Check => panic!("expected predict"),
        }
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_config_is_global() {
        let cli = Cli::try_parse_from(["bioactivity", "check", "--config", "conf/bioactivity.toml"]).unwrap();
        assert!(matches!(cli.command, Command::Check));
        assert_eq!(cli.config, Some(PathBuf::from("conf/bioactivity.toml")));
    }

    #[test]
    fn test_predict_requires_input() {
        assert!(Cli::try_parse_from(["bioactivity", "predict"]).is_err());
    }
}
