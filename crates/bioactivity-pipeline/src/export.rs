//! Two-column prediction table and its download encodings.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bioactivity_common::config::ExportConfig;
use bioactivity_common::{BioactivityError, PredictionRecord, Result};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct PredictionExport {
    pub identifier_column: String,
    pub score_column: String,
    pub file_name: String,
    pub records: Vec<PredictionRecord>,
}

impl PredictionExport {
    /// Pair identifiers with scores by position.
    pub fn new<S: AsRef<str>>(identifiers: &[S], scores: &[f64], config: &ExportConfig) -> Result<Self> {
        if identifiers.len() != scores.len() {
            return Err(BioactivityError::LengthMismatch {
                identifiers: identifiers.len(),
                scores: scores.len(),
            });
        }
        let records = identifiers
            .iter()
            .zip(scores)
            .map(|(identifier, &score)| PredictionRecord { identifier: identifier.as_ref().to_string(), score })
            .collect();
        Ok(Self {
            identifier_column: config.identifier_column.clone(),
            score_column: config.score_column.clone(),
            file_name: config.file_name.clone(),
            records,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn to_csv(&self) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record([&self.identifier_column, &self.score_column])?;
        for record in &self.records {
            writer.write_record([record.identifier.as_str(), record.score.to_string().as_str()])?;
        }
        writer
            .into_inner()
            .map_err(|e| BioactivityError::Io(e.into_error()))
    }

    pub fn to_csv_string(&self) -> Result<String> {
        String::from_utf8(self.to_csv()?)
            .map_err(|e| BioactivityError::Other(anyhow::anyhow!("export is not UTF-8: {}", e)))
    }

    /// `data:` URI for an in-page download link.
    pub fn data_uri(&self) -> Result<String> {
        Ok(format!("data:text/csv;base64,{}", STANDARD.encode(self.to_csv()?)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_csv_layout() {
        let export = PredictionExport::new(&ids(&["mol1", "mol2"]), &[6.25, 4.5], &ExportConfig::default()).unwrap();
        assert_eq!(export.to_csv_string().unwrap(), "molecule_name,pIC50\nmol1,6.25\nmol2,4.5\n");
    }

    #[test]
    fn test_identifiers_are_quoted_when_needed() {
        let export = PredictionExport::new(&ids(&["a,b", "say \"hi\""]), &[1.0, 2.0], &ExportConfig::default()).unwrap();
        assert_eq!(
            export.to_csv_string().unwrap(),
            "molecule_name,pIC50\n\"a,b\",1\n\"say \"\"hi\"\"\",2\n"
        );
    }

    #[test]
    fn test_length_mismatch() {
        let err = PredictionExport::new(&ids(&["mol1"]), &[1.0, 2.0], &ExportConfig::default()).unwrap_err();
        assert!(matches!(err, BioactivityError::LengthMismatch { identifiers: 1, scores: 2 }));
    }

    #[test]
    fn test_data_uri_round_trips_csv() {
        let export = PredictionExport::new(&ids(&["mol1"]), &[5.0], &ExportConfig::default()).unwrap();
        let uri = export.data_uri().unwrap();
        let payload = uri.strip_prefix("data:text/csv;base64,").unwrap();
        let decoded = STANDARD.decode(payload).unwrap();
        assert_eq!(decoded, export.to_csv().unwrap());
    }

    #[test]
    fn test_custom_column_names() {
        let config = ExportConfig {
            file_name: "tert.csv".into(),
            identifier_column: "id".into(),
            score_column: "score".into(),
        };
        let export = PredictionExport::new(&ids(&["x"]), &[3.0], &config).unwrap();
        assert!(export.to_csv_string().unwrap().starts_with("id,score\n"));
        assert_eq!(export.file_name, "tert.csv");
    }
}
