//! Orchestrator for one prediction request.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use bioactivity_common::config::ExportConfig;
use bioactivity_common::{BioactivityError, Config, InputRecord, Result};
use bioactivity_descriptors::input::write_intermediate;
use bioactivity_descriptors::table::{TablePreview, NAME_COLUMN};
use bioactivity_descriptors::{DescriptorTable, DescriptorTool, FeatureMatrix, PadelRunner, ReferenceFeatureList};
use bioactivity_model::{check_schema, ModelArtifact, Regressor};

use crate::export::PredictionExport;

/// Name of the descriptor CSV inside a run directory.
pub const DESCRIPTOR_OUTPUT: &str = "descriptors_output.csv";

const PREVIEW_ROWS: usize = 20;
const PREVIEW_COLUMNS: usize = 12;

/// Everything a finished request shows the user.
#[derive(Debug, Clone)]
pub struct PredictionRun {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    /// Raw tool output, truncated for display.
    pub descriptors: TablePreview,
    /// Model input after projection onto the reference features.
    pub features: FeatureMatrix,
    pub export: PredictionExport,
}

pub struct PredictionPipeline {
    tool: Arc<dyn DescriptorTool>,
    reference: ReferenceFeatureList,
    model: Arc<dyn Regressor>,
    work_dir: PathBuf,
    export: ExportConfig,
}

impl PredictionPipeline {
    pub fn new<P: AsRef<Path>>(
        tool: Arc<dyn DescriptorTool>,
        reference: ReferenceFeatureList,
        model: Arc<dyn Regressor>,
        work_dir: P,
        export: ExportConfig,
    ) -> Self {
        Self {
            tool,
            reference,
            model,
            work_dir: work_dir.as_ref().to_path_buf(),
            export,
        }
    }

    /// Load the persisted artifacts named in `config` and validate that the
    /// model and the reference feature list agree on the input schema.
    pub fn from_config(config: &Config) -> Result<Self> {
        let reference = ReferenceFeatureList::from_path(config.feature_list_path())?;
        let model = ModelArtifact::load(config.model_path())?;
        check_schema(&model, &reference)?;
        info!("Model and reference feature list agree on {} features", reference.len());

        Ok(Self::new(
            Arc::new(PadelRunner::from_config(config)),
            reference,
            Arc::new(model),
            config.work_dir(),
            config.export.clone(),
        ))
    }

    pub fn reference(&self) -> &ReferenceFeatureList {
        &self.reference
    }

    /// Check the descriptor tool's artifacts without running anything.
    pub fn preflight(&self) -> Result<()> {
        self.tool.check()
    }

    /// Run all stages for one upload. Stops at the first failing stage.
    pub async fn run(&self, records: &[InputRecord]) -> Result<PredictionRun> {
        if records.is_empty() {
            return Err(BioactivityError::EmptyInput);
        }
        let run_id = Uuid::new_v4();
        let span = info_span!("prediction", %run_id, molecules = records.len());
        self.run_stages(run_id, records).instrument(span).await
    }

    async fn run_stages(&self, run_id: Uuid, records: &[InputRecord]) -> Result<PredictionRun> {
        let started_at = Utc::now();
        let timer = Instant::now();

        // ── Descriptor stage ────────────────────────────────────────────────
        // The run directory is removed when the guard drops, including when
        // this future is cancelled while the tool is still running.
        tokio::fs::create_dir_all(&self.work_dir).await?;
        let run_dir = tempfile::Builder::new()
            .prefix(&format!("{run_id}-"))
            .tempdir_in(&self.work_dir)?;
        let computed = self.compute_descriptors(run_dir.path(), records).await;
        let run_path = run_dir.path().to_path_buf();
        if let Err(e) = run_dir.close() {
            warn!("Failed to remove run directory {:?}: {}", run_path, e);
        }
        let table = computed?;
        info!("Descriptors calculated: shape {}", table.shape());

        if table.len() != records.len() {
            return Err(BioactivityError::RowCountMismatch {
                expected: records.len(),
                found: table.len(),
            });
        }

        let identifiers: Vec<&str> = records.iter().map(|r| r.identifier.as_str()).collect();
        let in_upload_order = table.identifiers().map_or(true, |names| names == identifiers);
        let table = if in_upload_order {
            table
        } else {
            warn!("Descriptor rows are not in upload order; realigning by {}", NAME_COLUMN);
            table.ordered_by(&identifiers)?
        };

        // ── Feature alignment ───────────────────────────────────────────────
        let features = self.reference.project(&table)?;
        info!("Descriptor subset: shape {}", features.shape());

        // ── Inference ───────────────────────────────────────────────────────
        let scores = self.model.predict(&features)?;
        debug!("Model returned {} scores", scores.len());

        // ── Export ──────────────────────────────────────────────────────────
        let export = PredictionExport::new(&identifiers, &scores, &self.export)?;

        let duration_ms = timer.elapsed().as_millis() as u64;
        info!("Prediction complete: {} molecules in {}ms", export.len(), duration_ms);

        Ok(PredictionRun {
            run_id,
            started_at,
            duration_ms,
            descriptors: table.preview(PREVIEW_ROWS, PREVIEW_COLUMNS),
            features,
            export,
        })
    }

    /// Write the intermediate file into a fresh run directory, run the tool
    /// and read its output.
    async fn compute_descriptors(&self, run_dir: &Path, records: &[InputRecord]) -> Result<DescriptorTable> {
        let input_dir = run_dir.join("input");
        tokio::fs::create_dir_all(&input_dir).await?;
        write_intermediate(&input_dir, records)?;

        let output_csv = run_dir.join(DESCRIPTOR_OUTPUT);
        self.tool.calculate(&input_dir, &output_csv).await?;
        DescriptorTable::from_path(&output_csv)
    }
}
