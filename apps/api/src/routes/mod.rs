pub mod health;

use axum::extract::DefaultBodyLimit;
use axum::{routing::get, routing::post, Router};

use crate::analysis::handlers as analysis_handlers;
use crate::capture::handlers as capture_handlers;
use crate::state::AppState;

/// Uploads are capped at 10 MiB; axum's 2 MiB default is too small for
/// scanned CVs.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/analyze", post(analysis_handlers::handle_analyze))
        .route("/save-email", post(capture_handlers::handle_save_email))
        .route("/feedback", post(capture_handlers::handle_feedback))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
