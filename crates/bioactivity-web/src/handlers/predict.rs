//! Upload form submission: runs the full pipeline and renders every stage.

use axum::{
    extract::{Multipart, State},
    response::Html,
};
use tracing::{info, warn};

use bioactivity_descriptors::input::parse_upload;

use crate::handlers::read_upload;
use crate::render;
use crate::state::SharedState;

pub async fn predict_submit(
    State(state): State<SharedState>,
    multipart: Multipart,
) -> Html<String> {
    let upload = match read_upload(multipart).await {
        Ok(Some(upload)) => upload,
        Ok(None) => return Html(render::missing_upload_page()),
        Err(e) => return Html(render::error_page(None, &e)),
    };

    let records = match parse_upload(&upload.bytes) {
        Ok(records) => records,
        Err(e) => {
            warn!("Rejected upload {:?}: {}", upload.file_name, e);
            return Html(render::error_page(None, &e));
        }
    };
    info!(
        "Prediction requested for {} molecules from {:?}",
        records.len(),
        upload.file_name.as_deref().unwrap_or("upload")
    );

    let result = {
        let _guard = state.run_lock.lock().await;
        state.pipeline.run(&records).await
    };

    match result {
        Ok(run) => Html(render::result_page(&records, &run)),
        Err(e) => {
            warn!("Prediction failed ({}): {}", e.category(), e);
            Html(render::error_page(Some(&records), &e))
        }
    }
}
