//! HTTP handlers for all web routes.

pub mod api;
pub mod health;
pub mod home;
pub mod predict;

use axum::extract::Multipart;
use bioactivity_common::BioactivityError;

/// Form field carrying the structures file.
pub const UPLOAD_FIELD: &str = "file";

/// A file received through the upload form.
pub struct Upload {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// Pull the upload field out of a multipart body. `Ok(None)` when the form
/// was submitted without a file.
pub async fn read_upload(mut multipart: Multipart) -> Result<Option<Upload>, BioactivityError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;
        if bytes.is_empty() && file_name.as_deref().map_or(true, str::is_empty) {
            return Ok(None);
        }
        return Ok(Some(Upload { file_name, bytes: bytes.to_vec() }));
    }
    Ok(None)
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> BioactivityError {
    BioactivityError::MalformedInput {
        line: 0,
        reason: format!("could not read upload: {}", e.body_text()),
    }
}
