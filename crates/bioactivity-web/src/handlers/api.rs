//! JSON prediction API.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::warn;

use bioactivity_common::BioactivityError;
use bioactivity_descriptors::input::parse_upload;

use crate::handlers::read_upload;
use crate::state::SharedState;

fn status_for(err: &BioactivityError) -> StatusCode {
    match err.category() {
        "malformed_input" => StatusCode::BAD_REQUEST,
        "schema_mismatch" => StatusCode::UNPROCESSABLE_ENTITY,
        "descriptor_tool" => StatusCode::BAD_GATEWAY,
        "missing_artifact" => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: &BioactivityError) -> (StatusCode, Json<Value>) {
    (
        status_for(err),
        Json(json!({ "status": "error", "category": err.category(), "error": err.to_string() })),
    )
}

pub async fn api_predict(
    State(state): State<SharedState>,
    multipart: Multipart,
) -> (StatusCode, Json<Value>) {
    let upload = match read_upload(multipart).await {
        Ok(Some(upload)) => upload,
        Ok(None) => return error_response(&BioactivityError::EmptyInput),
        Err(e) => return error_response(&e),
    };
    let records = match parse_upload(&upload.bytes) {
        Ok(records) => records,
        Err(e) => return error_response(&e),
    };

    let result = {
        let _guard = state.run_lock.lock().await;
        state.pipeline.run(&records).await
    };

    match result {
        Ok(run) => (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "run_id": run.run_id,
                "started_at": run.started_at,
                "duration_ms": run.duration_ms,
                "descriptor_shape": run.descriptors.shape,
                "feature_shape": run.features.shape(),
                "predictions": run.export.records,
            })),
        ),
        Err(e) => {
            warn!("API prediction failed ({}): {}", e.category(), e);
            error_response(&e)
        }
    }
}
