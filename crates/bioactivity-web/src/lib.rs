//! bioactivity-web: web form for bioactivity prediction.
//! Provides:
//!   - Upload form for a structures file
//!   - Prediction results page with a CSV download
//!   - JSON prediction API
//!   - Health endpoint reporting artifact status

pub mod router;
pub mod handlers;
pub mod render;
pub mod state;
