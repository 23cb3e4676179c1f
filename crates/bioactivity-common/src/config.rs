//! Configuration loading.
//! Reads bioactivity.toml from the current directory or the path in the
//! BIOACTIVITY_CONFIG env var. Every field has a default, so a missing file
//! yields a usable configuration rooted at the current directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{BioactivityError, Result};

pub const CONFIG_ENV_VAR: &str = "BIOACTIVITY_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "bioactivity.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Directory that relative artifact paths are resolved against.
    /// Defaults to the directory holding the config file.
    #[serde(default)]
    pub base_dir: Option<PathBuf>,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub descriptors: DescriptorConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

// ── Server ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_host()             -> String { "127.0.0.1".to_string() }
fn default_port()             -> u16    { 3001 }
fn default_max_upload_bytes() -> usize  { 10 * 1024 * 1024 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

// ── Descriptor tool ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptorConfig {
    /// Java launcher, looked up on PATH when not absolute.
    #[serde(default = "default_java")]
    pub java: String,
    #[serde(default = "default_jar")]
    pub jar: PathBuf,
    /// PaDEL descriptor-types file selecting the fingerprint set.
    #[serde(default = "default_fingerprint_xml")]
    pub fingerprint_xml: PathBuf,
    /// JVM heap size, passed as both -Xms and -Xmx.
    #[serde(default = "default_heap")]
    pub heap: String,
    #[serde(default = "bool_true")]
    pub remove_salt: bool,
    #[serde(default = "bool_true")]
    pub standardize_nitro: bool,
    /// Scratch directory; each run gets its own subdirectory.
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,
}

fn default_java()            -> String  { "java".to_string() }
fn default_jar()             -> PathBuf { PathBuf::from("PaDEL-Descriptor/PaDEL-Descriptor.jar") }
fn default_fingerprint_xml() -> PathBuf { PathBuf::from("PaDEL-Descriptor/PubchemFingerprinter.xml") }
fn default_heap()            -> String  { "2G".to_string() }
fn default_work_dir()        -> PathBuf { PathBuf::from("work") }
fn bool_true()               -> bool    { true }

impl Default for DescriptorConfig {
    fn default() -> Self {
        Self {
            java: default_java(),
            jar: default_jar(),
            fingerprint_xml: default_fingerprint_xml(),
            heap: default_heap(),
            remove_salt: true,
            standardize_nitro: true,
            work_dir: default_work_dir(),
        }
    }
}

// ── Model ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Serialized regression model (JSON artifact).
    #[serde(default = "default_model_path")]
    pub path: PathBuf,
    /// CSV whose header row lists the descriptor columns the model expects.
    #[serde(default = "default_feature_list")]
    pub feature_list: PathBuf,
}

fn default_model_path()   -> PathBuf { PathBuf::from("telomerase_model.json") }
fn default_feature_list() -> PathBuf { PathBuf::from("descriptor_list.csv") }

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
            feature_list: default_feature_list(),
        }
    }
}

// ── Export ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_file_name")]
    pub file_name: String,
    #[serde(default = "default_identifier_column")]
    pub identifier_column: String,
    #[serde(default = "default_score_column")]
    pub score_column: String,
}

fn default_file_name()         -> String { "prediction.csv".to_string() }
fn default_identifier_column() -> String { "molecule_name".to_string() }
fn default_score_column()      -> String { "pIC50".to_string() }

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: default_file_name(),
            identifier_column: default_identifier_column(),
            score_column: default_score_column(),
        }
    }
}

impl Config {
    /// Load configuration.
    /// Checks BIOACTIVITY_CONFIG env var first, then current directory.
    pub fn load() -> Result<Self> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) => Self::from_path(path),
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_path(DEFAULT_CONFIG_FILE),
            Err(_) => {
                warn!("No {} found, using built-in defaults", DEFAULT_CONFIG_FILE);
                let config = Config::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Load configuration from an explicit file. A missing file is an error.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(BioactivityError::MissingArtifact {
                kind: "config file",
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        if config.base_dir.is_none() {
            config.base_dir = path.parent().map(Path::to_path_buf);
        }
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(BioactivityError::Config("server.port must be non-zero".into()));
        }
        if self.descriptors.heap.trim().is_empty() {
            return Err(BioactivityError::Config("descriptors.heap must not be empty".into()));
        }
        if self.export.file_name.trim().is_empty() {
            return Err(BioactivityError::Config("export.file_name must not be empty".into()));
        }
        let id_col = self.export.identifier_column.trim();
        let score_col = self.export.score_column.trim();
        if id_col.is_empty() || score_col.is_empty() {
            return Err(BioactivityError::Config("export column names must not be empty".into()));
        }
        if id_col == score_col {
            return Err(BioactivityError::Config(format!(
                "export identifier and score columns are both {:?}",
                id_col
            )));
        }
        Ok(())
    }

    /// Resolve a configured path against `base_dir`; absolute paths pass through.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }
        match &self.base_dir {
            Some(base) if !base.as_os_str().is_empty() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    pub fn jar_path(&self)          -> PathBuf { self.resolve(&self.descriptors.jar) }
    pub fn fingerprint_path(&self)  -> PathBuf { self.resolve(&self.descriptors.fingerprint_xml) }
    pub fn work_dir(&self)          -> PathBuf { self.resolve(&self.descriptors.work_dir) }
    pub fn model_path(&self)        -> PathBuf { self.resolve(&self.model.path) }
    pub fn feature_list_path(&self) -> PathBuf { self.resolve(&self.model.feature_list) }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
