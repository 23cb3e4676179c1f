use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BioactivityError {
    #[error("Missing {kind}: {path}")]
    MissingArtifact { kind: &'static str, path: PathBuf },

    #[error("Uploaded file contains no molecules")]
    EmptyInput,

    #[error("Malformed input on line {line}: {reason}")]
    MalformedInput { line: usize, reason: String },

    #[error("Descriptor calculation failed ({status}): {stderr}")]
    DescriptorTool { status: String, stderr: String },

    #[error("Descriptor output error: {0}")]
    DescriptorOutput(String),

    #[error("Descriptor table has {found} rows but {expected} molecules were submitted")]
    RowCountMismatch { expected: usize, found: usize },

    #[error("Molecule {identifier:?} (input row {row}) has no matching row in the descriptor table")]
    UnmatchedIdentifier { row: usize, identifier: String },

    #[error("Descriptor table is missing reference columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Non-numeric value {value:?} in column {column} (row {row})")]
    NonNumericFeature { row: usize, column: String, value: String },

    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Cannot pair {identifiers} identifiers with {scores} scores")]
    LengthMismatch { identifiers: usize, scores: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BioactivityError {
    /// Coarse error class reported to users and API clients.
    pub fn category(&self) -> &'static str {
        match self {
            Self::MissingArtifact { .. } => "missing_artifact",
            Self::EmptyInput | Self::MalformedInput { .. } => "malformed_input",
            Self::DescriptorTool { .. } | Self::DescriptorOutput(_) => "descriptor_tool",
            Self::RowCountMismatch { .. }
            | Self::UnmatchedIdentifier { .. }
            | Self::MissingColumns(_)
            | Self::NonNumericFeature { .. }
            | Self::SchemaMismatch(_) => "schema_mismatch",
            Self::Model(_) => "model",
            Self::Config(_) | Self::ConfigParse(_) => "config",
            Self::LengthMismatch { .. }
            | Self::Io(_)
            | Self::Csv(_)
            | Self::Serialization(_)
            | Self::Other(_) => "internal",
        }
    }
}

pub type Result<T> = std::result::Result<T, BioactivityError>;
