//! HTML rendering for the prediction pages.

use std::fmt::Write;

use bioactivity_common::{BioactivityError, InputRecord};
use bioactivity_descriptors::table::TablePreview;
use bioactivity_descriptors::FeatureMatrix;
use bioactivity_pipeline::{PredictionExport, PredictionRun};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; color: #1f2933; background: #f5f7fa; }
.app-container { display: flex; min-height: 100vh; }
.sidebar { width: 300px; padding: 1.5rem; background: #e4e7eb; }
.main-content { flex: 1; padding: 2rem; max-width: 1100px; }
.banner { padding: 0.75rem 1rem; border-radius: 6px; margin: 1rem 0; }
.banner-info { background: #e3f2fd; } .banner-warning { background: #fff8e1; }
.banner-error { background: #fdecea; } .banner-success { background: #e8f5e9; }
.table-container { overflow-x: auto; }
table { border-collapse: collapse; font-size: 0.9rem; }
th, td { border: 1px solid #cbd2d9; padding: 0.3rem 0.6rem; text-align: left; }
td.num { text-align: right; font-family: monospace; }
.shape { color: #616e7c; font-family: monospace; }
pre { white-space: pre-wrap; background: #fff; padding: 0.5rem; }
"#;

const PREVIEW_FEATURE_ROWS: usize = 20;
const PREVIEW_FEATURE_COLUMNS: usize = 12;

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[derive(Debug, Clone, Copy)]
pub enum BannerKind {
    Info,
    Warning,
    Error,
    Success,
}

impl BannerKind {
    fn class(self) -> &'static str {
        match self {
            BannerKind::Info => "banner-info",
            BannerKind::Warning => "banner-warning",
            BannerKind::Error => "banner-error",
            BannerKind::Success => "banner-success",
        }
    }
}

pub fn banner(kind: BannerKind, message: &str) -> String {
    format!(r#"<div class="banner {}">{}</div>"#, kind.class(), escape(message))
}

fn sidebar() -> String {
    r#"<aside class="sidebar">
    <h2>1. Upload your input file</h2>
    <form method="POST" action="/predict" enctype="multipart/form-data">
        <input type="file" name="file" accept=".txt,.smi">
        <p><button type="submit">Predict</button></p>
    </form>
    <p class="shape">One molecule per line: <code>SMILES identifier</code>, separated by whitespace, no header.</p>
</aside>"#
        .to_string()
}

/// Full page: sidebar form plus the given main-content sections.
pub fn page(sections: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Bioactivity Prediction</title>
    <style>{}</style>
</head>
<body>
<div class="app-container">
{}
<main class="main-content">
    <h1>Bioactivity Prediction App (Telomerase Reverse Transcriptase)</h1>
    <p>Predict the bioactivity (pIC50) of molecules towards inhibiting the
    <code>Telomerase Reverse Transcriptase</code> enzyme, a drug target for cancer treatment.</p>
    <p><strong>Credits</strong>: descriptors calculated using
    <a href="http://www.yapcwsoft.com/dd/padeldescriptor/">PaDEL-Descriptor</a>
    (<a href="https://doi.org/10.1002/jcc.21707">Read the Paper</a>).</p>
    <hr>
    {}
</main>
</div>
</body>
</html>"#,
        STYLE,
        sidebar(),
        sections
    )
}

pub fn idle_page() -> String {
    page(&banner(BannerKind::Info, "Upload input data in the sidebar to start!"))
}

pub fn input_section(records: &[InputRecord]) -> String {
    let mut rows = String::new();
    for (i, r) in records.iter().enumerate() {
        let _ = write!(
            rows,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            i,
            escape(&r.structure),
            escape(&r.identifier)
        );
    }
    format!(
        r#"<h2>Original input data</h2>
<div class="table-container"><table>
<thead><tr><th></th><th>0</th><th>1</th></tr></thead>
<tbody>{}</tbody>
</table></div>"#,
        rows
    )
}

pub fn descriptor_section(preview: &TablePreview) -> String {
    let header: String = preview
        .columns
        .iter()
        .map(|c| format!("<th>{}</th>", escape(c)))
        .collect();
    let body: String = preview
        .rows
        .iter()
        .map(|row| {
            let cells: String = row.iter().map(|v| format!("<td>{}</td>", escape(v))).collect();
            format!("<tr>{}</tr>", cells)
        })
        .collect();
    let note = if preview.is_truncated() { " (preview)" } else { "" };
    format!(
        r#"<h2>Calculated molecular descriptors</h2>
<div class="table-container"><table><thead><tr>{}</tr></thead><tbody>{}</tbody></table></div>
<p class="shape">{}{}</p>"#,
        header,
        body,
        preview.shape,
        note
    )
}

pub fn feature_section(features: &FeatureMatrix) -> String {
    let header: String = features
        .columns()
        .iter()
        .take(PREVIEW_FEATURE_COLUMNS)
        .map(|c| format!("<th>{}</th>", escape(c)))
        .collect();
    let body: String = features
        .rows()
        .iter()
        .take(PREVIEW_FEATURE_ROWS)
        .map(|row| {
            let cells: String = row
                .iter()
                .take(PREVIEW_FEATURE_COLUMNS)
                .map(|v| format!(r#"<td class="num">{}</td>"#, v))
                .collect();
            format!("<tr>{}</tr>", cells)
        })
        .collect();
    format!(
        r#"<h2>Subset of descriptors from previously built models</h2>
<div class="table-container"><table><thead><tr>{}</tr></thead><tbody>{}</tbody></table></div>
<p class="shape">{}</p>"#,
        header,
        body,
        features.shape()
    )
}

pub fn prediction_section(export: &PredictionExport) -> String {
    let rows: String = export
        .records
        .iter()
        .map(|r| {
            format!(
                r#"<tr><td>{}</td><td class="num">{}</td></tr>"#,
                escape(&r.identifier),
                r.score
            )
        })
        .collect();
    let download = match export.data_uri() {
        Ok(uri) => format!(
            r#"<p><a href="{}" download="{}">Download Predictions</a></p>"#,
            uri,
            escape(&export.file_name)
        ),
        Err(e) => banner(BannerKind::Error, &format!("Could not encode download: {}", e)),
    };
    format!(
        r#"<h2>Prediction output</h2>
<div class="table-container"><table>
<thead><tr><th>{}</th><th>{}</th></tr></thead>
<tbody>{}</tbody>
</table></div>
{}"#,
        escape(&export.identifier_column),
        escape(&export.score_column),
        rows,
        download
    )
}

pub fn result_page(records: &[InputRecord], run: &PredictionRun) -> String {
    let sections = [
        input_section(records),
        banner(
            BannerKind::Success,
            &format!("Molecular descriptors calculated successfully ({} ms).", run.duration_ms),
        ),
        descriptor_section(&run.descriptors),
        feature_section(&run.features),
        prediction_section(&run.export),
    ];
    page(&sections.concat())
}

/// User-facing message for a failed request.
pub fn error_message(err: &BioactivityError) -> String {
    match err {
        BioactivityError::DescriptorTool { .. } | BioactivityError::DescriptorOutput(_) => {
            format!("Error running PaDEL-Descriptor: {}", err)
        }
        BioactivityError::Model(_) => format!("Error loading model: {}", err),
        BioactivityError::EmptyInput | BioactivityError::MalformedInput { .. } => {
            format!("Please upload a valid input file! {}", err)
        }
        _ => format!("Error processing descriptors: {}", err),
    }
}

/// Error banner, keeping the uploaded data visible when it was parsed.
pub fn error_page(records: Option<&[InputRecord]>, err: &BioactivityError) -> String {
    let mut sections = String::new();
    if let Some(records) = records {
        sections.push_str(&input_section(records));
    }
    sections.push_str(&banner(BannerKind::Error, &error_message(err)));
    page(&sections)
}

pub fn missing_upload_page() -> String {
    page(&banner(BannerKind::Warning, "Please upload a valid input file!"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<b onclick="x">&'"#), "&lt;b onclick=&quot;x&quot;&gt;&amp;&#39;");
        assert_eq!(escape("C1=CC=CC=C1"), "C1=CC=CC=C1");
    }

    #[test]
    fn test_error_page_keeps_input_visible() {
        let records = vec![InputRecord::new("CCO", "<mol1>")];
        let err = BioactivityError::DescriptorTool { status: "exit status: 1".into(), stderr: "boom".into() };
        let html = error_page(Some(&records), &err);
        assert!(html.contains("Original input data"));
        assert!(html.contains("&lt;mol1&gt;"));
        assert!(html.contains("Error running PaDEL-Descriptor"));
        assert!(!html.contains("Prediction output"));
    }

    #[test]
    fn test_idle_page_has_upload_form() {
        let html = idle_page();
        assert!(html.contains(r#"enctype="multipart/form-data""#));
        assert!(html.contains(r#"name="file""#));
        assert!(html.contains("Upload input data in the sidebar to start!"));
    }
}
