//! Upload parsing and the intermediate structures file.

use std::path::{Path, PathBuf};

use bioactivity_common::{BioactivityError, InputRecord, Result};
use tracing::debug;

/// File name PaDEL picks up from the per-run input directory.
pub const INTERMEDIATE_FILE: &str = "molecule.smi";

/// Parse an uploaded structures file.
///
/// Each non-blank line holds exactly two whitespace-separated fields: the
/// structure string and the molecule identifier. No header row.
pub fn parse_upload(bytes: &[u8]) -> Result<Vec<InputRecord>> {
    let text = std::str::from_utf8(bytes).map_err(|e| BioactivityError::MalformedInput {
        line: line_of_offset(bytes, e.valid_up_to()),
        reason: "file is not valid UTF-8 text".to_string(),
    })?;

    let mut records = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.as_slice() {
            [] => continue,
            [structure, identifier] => records.push(InputRecord::new(*structure, *identifier)),
            other => {
                return Err(BioactivityError::MalformedInput {
                    line: idx + 1,
                    reason: format!("expected 2 fields (structure, identifier), found {}", other.len()),
                })
            }
        }
    }

    if records.is_empty() {
        return Err(BioactivityError::EmptyInput);
    }
    debug!("Parsed {} input records", records.len());
    Ok(records)
}

fn line_of_offset(bytes: &[u8], offset: usize) -> usize {
    bytes[..offset].iter().filter(|&&b| b == b'\n').count() + 1
}

/// Write records as tab-separated `structure<TAB>identifier` lines into `dir`.
pub fn write_intermediate(dir: &Path, records: &[InputRecord]) -> Result<PathBuf> {
    let path = dir.join(INTERMEDIATE_FILE);
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .from_path(&path)?;
    for record in records {
        writer.write_record([record.structure.as_str(), record.identifier.as_str()])?;
    }
    writer.flush()?;
    debug!("Wrote {} records to {:?}", records.len(), path);
    Ok(path)
}
