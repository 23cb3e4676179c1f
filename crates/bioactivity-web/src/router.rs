//! Axum router: maps all URL paths to handlers.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::handlers::{
    api::api_predict,
    health::health,
    home::home_page,
    predict::predict_submit,
};
use crate::state::{AppState, SharedState};

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.server.max_upload_bytes;
    let shared: SharedState = Arc::new(state);

    Router::new()
        // Pages
        .route("/",        get(home_page))
        .route("/predict", post(predict_submit))

        // API endpoints
        .route("/api/predict", post(api_predict))
        .route("/health",      get(health))

        // Middleware
        .layer(DefaultBodyLimit::max(upload_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
