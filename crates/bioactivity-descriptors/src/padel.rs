//! Descriptor calculation using PaDEL-Descriptor.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{info, debug, warn};

use bioactivity_common::config::DescriptorConfig;
use bioactivity_common::{BioactivityError, Config, Result};

/// An external batch tool turning a directory of structure files into a
/// descriptor CSV.
#[async_trait]
pub trait DescriptorTool: Send + Sync {
    /// Compute descriptors for every structure file in `input_dir` and write
    /// them to `output_csv`.
    async fn calculate(&self, input_dir: &Path, output_csv: &Path) -> Result<()>;

    /// Verify the tool's on-disk artifacts exist.
    fn check(&self) -> Result<()>;
}

/// Wrapper for PaDEL-Descriptor execution through a JVM.
#[derive(Debug, Clone)]
pub struct PadelRunner {
    java: PathBuf,
    jar: PathBuf,
    fingerprint_xml: PathBuf,
    heap: String,
    remove_salt: bool,
    standardize_nitro: bool,
}

impl PadelRunner {
    /// Create a new PadelRunner with the default flag set.
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(jar: P, fingerprint_xml: Q) -> Self {
        let defaults = DescriptorConfig::default();
        Self {
            java: PathBuf::from(defaults.java),
            jar: jar.as_ref().to_path_buf(),
            fingerprint_xml: fingerprint_xml.as_ref().to_path_buf(),
            heap: defaults.heap,
            remove_salt: defaults.remove_salt,
            standardize_nitro: defaults.standardize_nitro,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            java: PathBuf::from(&config.descriptors.java),
            jar: config.jar_path(),
            fingerprint_xml: config.fingerprint_path(),
            heap: config.descriptors.heap.clone(),
            remove_salt: config.descriptors.remove_salt,
            standardize_nitro: config.descriptors.standardize_nitro,
        }
    }

    pub fn with_java<P: AsRef<Path>>(mut self, java: P) -> Self {
        self.java = java.as_ref().to_path_buf();
        self
    }

    /// Arguments passed to the JVM, in order.
    pub fn args(&self, input_dir: &Path, output_csv: &Path) -> Vec<String> {
        let mut args = vec![
            format!("-Xms{}", self.heap),
            format!("-Xmx{}", self.heap),
            "-Djava.awt.headless=true".to_string(),
            "-jar".to_string(),
            self.jar.display().to_string(),
        ];
        if self.remove_salt {
            args.push("-removesalt".to_string());
        }
        if self.standardize_nitro {
            args.push("-standardizenitro".to_string());
        }
        args.extend([
            "-retainorder".to_string(),
            "-fingerprints".to_string(),
            "-descriptortypes".to_string(),
            self.fingerprint_xml.display().to_string(),
            "-dir".to_string(),
            input_dir.display().to_string(),
            "-file".to_string(),
            output_csv.display().to_string(),
        ]);
        args
    }
}

#[async_trait]
impl DescriptorTool for PadelRunner {
    async fn calculate(&self, input_dir: &Path, output_csv: &Path) -> Result<()> {
        self.check()?;
        info!("Running PaDEL-Descriptor on {:?}", input_dir);

        let output = Command::new(&self.java)
            .args(self.args(input_dir, output_csv))
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => BioactivityError::MissingArtifact {
                    kind: "java runtime",
                    path: self.java.clone(),
                },
                _ => BioactivityError::Io(e),
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            return Err(BioactivityError::DescriptorTool {
                status: output.status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }
        if !stderr.trim().is_empty() {
            debug!("PaDEL-Descriptor stderr: {}", stderr.trim());
        }

        if !output_csv.exists() {
            return Err(BioactivityError::DescriptorOutput(format!(
                "PaDEL-Descriptor exited successfully but wrote no {:?}",
                output_csv
            )));
        }

        debug!("PaDEL-Descriptor completed successfully. Output in {:?}", output_csv);
        Ok(())
    }

    fn check(&self) -> Result<()> {
        if !self.jar.is_file() {
            return Err(BioactivityError::MissingArtifact {
                kind: "PaDEL-Descriptor jar",
                path: self.jar.clone(),
            });
        }
        if !self.fingerprint_xml.is_file() {
            return Err(BioactivityError::MissingArtifact {
                kind: "fingerprint definition",
                path: self.fingerprint_xml.clone(),
            });
        }
        Ok(())
    }
}

/// Check whether a Java launcher can be started.
pub async fn java_available<P: AsRef<Path>>(java: P) -> bool {
    let status = Command::new(java.as_ref())
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;

    match status {
        Ok(s) => s.success(),
        Err(e) => {
            warn!("Java launcher {:?} unavailable: {}", java.as_ref(), e);
            false
        }
    }
}
