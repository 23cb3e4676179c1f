//! Artifact status for operators.

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::SharedState;

pub async fn health(State(state): State<SharedState>) -> Json<Value> {
    let (status, tool) = match state.pipeline.preflight() {
        Ok(()) => ("ok", "ready".to_string()),
        Err(e) => ("degraded", e.to_string()),
    };
    Json(json!({
        "status": status,
        "reference_features": state.pipeline.reference().len(),
        "descriptor_tool": tool,
    }))
}
