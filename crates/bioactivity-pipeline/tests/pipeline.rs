//! End-to-end pipeline runs against an in-process descriptor tool.
//!
//! Run with: cargo test --package bioactivity-pipeline --test pipeline

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use bioactivity_common::config::ExportConfig;
use bioactivity_common::{BioactivityError, Config, Result};
use bioactivity_descriptors::input::{parse_upload, INTERMEDIATE_FILE};
use bioactivity_descriptors::{DescriptorTool, FeatureMatrix, ReferenceFeatureList};
use bioactivity_model::{LinearRegressor, Regressor};
use bioactivity_pipeline::PredictionPipeline;

/// Stand-in for PaDEL: three substructure flags per molecule, plus a Name column.
struct FakePadel;

#[async_trait]
impl DescriptorTool for FakePadel {
    async fn calculate(&self, input_dir: &Path, output_csv: &Path) -> Result<()> {
        let smi = std::fs::read_to_string(input_dir.join(INTERMEDIATE_FILE))?;
        let mut csv = String::from("Name,FP_O,FP_N,FP_ring,FP_long\n");
        for line in smi.lines() {
            let (structure, name) = line.split_once('\t').expect("tab-separated intermediate file");
            let flag = |b: bool| if b { "1" } else { "0" };
            csv.push_str(&format!(
                "{},{},{},{},{}\n",
                name,
                flag(structure.contains('O')),
                flag(structure.contains('N')),
                flag(structure.contains('1')),
                flag(structure.len() > 3),
            ));
        }
        std::fs::write(output_csv, csv)?;
        Ok(())
    }

    fn check(&self) -> Result<()> {
        Ok(())
    }
}

/// Tool that fails like a crashing JVM, after looking at its input.
struct FailingPadel;

#[async_trait]
impl DescriptorTool for FailingPadel {
    async fn calculate(&self, input_dir: &Path, _output_csv: &Path) -> Result<()> {
        assert!(input_dir.join(INTERMEDIATE_FILE).exists());
        Err(BioactivityError::DescriptorTool {
            status: "exit status: 1".to_string(),
            stderr: "java.lang.OutOfMemoryError: Java heap space".to_string(),
        })
    }

    fn check(&self) -> Result<()> {
        Ok(())
    }
}

/// Tool that silently drops the last molecule.
struct LossyPadel;

#[async_trait]
impl DescriptorTool for LossyPadel {
    async fn calculate(&self, input_dir: &Path, output_csv: &Path) -> Result<()> {
        FakePadel.calculate(input_dir, output_csv).await?;
        let content = std::fs::read_to_string(output_csv)?;
        let mut lines: Vec<&str> = content.lines().collect();
        lines.pop();
        std::fs::write(output_csv, lines.join("\n") + "\n")?;
        Ok(())
    }

    fn check(&self) -> Result<()> {
        Ok(())
    }
}

/// Tool that writes its rows in reverse, as a multithreaded run may.
struct ReversedPadel;

#[async_trait]
impl DescriptorTool for ReversedPadel {
    async fn calculate(&self, input_dir: &Path, output_csv: &Path) -> Result<()> {
        FakePadel.calculate(input_dir, output_csv).await?;
        let content = std::fs::read_to_string(output_csv)?;
        let mut lines: Vec<&str> = content.lines().collect();
        lines[1..].reverse();
        std::fs::write(output_csv, lines.join("\n") + "\n")?;
        Ok(())
    }

    fn check(&self) -> Result<()> {
        Ok(())
    }
}

/// Tool that takes far longer than any caller is willing to wait.
struct SlowPadel;

#[async_trait]
impl DescriptorTool for SlowPadel {
    async fn calculate(&self, _input_dir: &Path, _output_csv: &Path) -> Result<()> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(())
    }

    fn check(&self) -> Result<()> {
        Ok(())
    }
}

/// Wraps a model and counts predict calls.
struct CountingModel {
    inner: LinearRegressor,
    calls: AtomicUsize,
}

impl Regressor for CountingModel {
    fn n_features(&self) -> usize {
        self.inner.n_features()
    }

    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.predict(features)
    }
}

fn reference(names: &[&str]) -> ReferenceFeatureList {
    ReferenceFeatureList::new(names.iter().map(|s| s.to_string()).collect()).unwrap()
}

fn counting_model() -> Arc<CountingModel> {
    // pIC50 = 5 + 1.5 * FP_N + 0.25 * FP_O
    Arc::new(CountingModel {
        inner: LinearRegressor::new(vec![1.5, 0.25], 5.0),
        calls: AtomicUsize::new(0),
    })
}

fn pipeline(tool: Arc<dyn DescriptorTool>, model: Arc<CountingModel>, work_dir: &Path) -> PredictionPipeline {
    PredictionPipeline::new(
        tool,
        reference(&["FP_N", "FP_O"]),
        model,
        work_dir,
        ExportConfig::default(),
    )
}

fn is_empty_dir(dir: &Path) -> bool {
    !dir.exists() || std::fs::read_dir(dir).unwrap().next().is_none()
}

#[tokio::test]
async fn test_two_molecule_scenario() {
    let work = tempfile::tempdir().unwrap();
    let model = counting_model();
    let pipeline = pipeline(Arc::new(FakePadel), model.clone(), work.path());

    let records = parse_upload(b"CCO mol1\nCCN mol2").unwrap();
    let run = pipeline.run(&records).await.unwrap();

    assert_eq!(run.descriptors.shape.rows, 2);
    assert_eq!(run.descriptors.columns[0], "Name");
    assert_eq!(run.features.columns(), &["FP_N".to_string(), "FP_O".to_string()]);
    assert_eq!(run.features.rows(), &[vec![0.0, 1.0], vec![1.0, 0.0]]);
    assert_eq!(
        run.export.to_csv_string().unwrap(),
        "molecule_name,pIC50\nmol1,5.25\nmol2,6.5\n"
    );
    assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    assert!(is_empty_dir(work.path()), "run directory must be removed");
}

#[tokio::test]
async fn test_export_has_one_row_per_uploaded_line() {
    let work = tempfile::tempdir().unwrap();
    let pipeline = pipeline(Arc::new(FakePadel), counting_model(), work.path());

    let upload: String = (0..25).map(|i| format!("C{}O mol{}\n", "C".repeat(i % 4), i)).collect();
    let records = parse_upload(upload.as_bytes()).unwrap();
    let run = pipeline.run(&records).await.unwrap();

    assert_eq!(run.export.len(), 25);
    let csv = run.export.to_csv_string().unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 26);
    assert!(lines.iter().all(|l| l.split(',').count() == 2));
    assert_eq!(lines[25].split(',').next(), Some("mol24"));
}

#[tokio::test]
async fn test_tool_failure_skips_inference_and_cleans_up() {
    let work = tempfile::tempdir().unwrap();
    let model = counting_model();
    let pipeline = pipeline(Arc::new(FailingPadel), model.clone(), work.path());

    let records = parse_upload(b"CCO mol1\nCCN mol2").unwrap();
    let err = pipeline.run(&records).await.unwrap_err();

    assert!(matches!(err, BioactivityError::DescriptorTool { .. }));
    assert!(err.to_string().contains("OutOfMemoryError"));
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    assert!(is_empty_dir(work.path()), "intermediate file must not outlive a failed run");
}

#[tokio::test]
async fn test_cancelled_run_leaves_no_files_behind() {
    let work = tempfile::tempdir().unwrap();
    let model = counting_model();
    let pipeline = pipeline(Arc::new(SlowPadel), model.clone(), work.path());

    let records = parse_upload(b"CCO mol1\nCCN mol2").unwrap();
    let cancelled = tokio::time::timeout(Duration::from_millis(200), pipeline.run(&records)).await;

    assert!(cancelled.is_err(), "run should still be in the tool stage");
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    assert!(is_empty_dir(work.path()), "stale files remain after cancellation");
}

#[tokio::test]
async fn test_reordered_tool_output_is_realigned_by_name() {
    let work = tempfile::tempdir().unwrap();
    let pipeline = pipeline(Arc::new(ReversedPadel), counting_model(), work.path());

    let records = parse_upload(b"CCO mol1\nCCN mol2\nCNO mol3").unwrap();
    let run = pipeline.run(&records).await.unwrap();

    assert_eq!(run.features.rows(), &[vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 1.0]]);
    assert_eq!(
        run.export.to_csv_string().unwrap(),
        "molecule_name,pIC50\nmol1,5.25\nmol2,6.5\nmol3,6.75\n"
    );
}

#[tokio::test]
async fn test_missing_reference_column_halts_before_inference() {
    let work = tempfile::tempdir().unwrap();
    let model = counting_model();
    let pipeline = PredictionPipeline::new(
        Arc::new(FakePadel),
        reference(&["FP_N", "PubchemFP880"]),
        model.clone(),
        work.path(),
        ExportConfig::default(),
    );

    let records = parse_upload(b"CCO mol1\nCCN mol2").unwrap();
    let err = pipeline.run(&records).await.unwrap_err();

    match err {
        BioactivityError::MissingColumns(missing) => assert_eq!(missing, vec!["PubchemFP880"]),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_dropped_rows_are_detected() {
    let work = tempfile::tempdir().unwrap();
    let model = counting_model();
    let pipeline = pipeline(Arc::new(LossyPadel), model.clone(), work.path());

    let records = parse_upload(b"CCO mol1\nCCN mol2\nCC mol3").unwrap();
    let err = pipeline.run(&records).await.unwrap_err();

    assert!(matches!(err, BioactivityError::RowCountMismatch { expected: 3, found: 2 }));
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_empty_record_list_is_rejected() {
    let work = tempfile::tempdir().unwrap();
    let pipeline = pipeline(Arc::new(FakePadel), counting_model(), work.path());
    assert!(matches!(pipeline.run(&[]).await.unwrap_err(), BioactivityError::EmptyInput));
}

#[test]
fn test_from_config_validates_schema() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("descriptor_list.csv"), "PubchemFP0,PubchemFP1\n").unwrap();
    std::fs::write(
        dir.path().join("telomerase_model.json"),
        r#"{ "feature_names": ["PubchemFP0", "PubchemFP7"],
             "estimator": { "type": "linear", "coefficients": [1.0, 2.0] } }"#,
    )
    .unwrap();
    let config_path = dir.path().join("bioactivity.toml");
    std::fs::write(&config_path, "").unwrap();

    let config = Config::from_path(&config_path).unwrap();
    let err = PredictionPipeline::from_config(&config).err().expect("schema mismatch");
    assert!(matches!(err, BioactivityError::SchemaMismatch(_)));
}

#[test]
fn test_from_config_reports_missing_model() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("descriptor_list.csv"), "PubchemFP0\n").unwrap();
    let config_path = dir.path().join("bioactivity.toml");
    std::fs::write(&config_path, "").unwrap();

    let config = Config::from_path(&config_path).unwrap();
    let err = PredictionPipeline::from_config(&config).err().expect("missing model");
    assert!(matches!(err, BioactivityError::MissingArtifact { kind: "model", .. }));

    // Tool artifacts are not required to build the pipeline, only to run it.
    std::fs::write(
        dir.path().join("telomerase_model.json"),
        r#"{ "estimator": { "type": "linear", "coefficients": [1.0] } }"#,
    )
    .unwrap();
    let pipeline = PredictionPipeline::from_config(&config).unwrap();
    assert!(matches!(
        pipeline.preflight().unwrap_err(),
        BioactivityError::MissingArtifact { kind: "PaDEL-Descriptor jar", .. }
    ));
}
