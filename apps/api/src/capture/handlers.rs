use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SaveEmailRequest {
    pub email: Option<String>,
}

/// POST /save-email
///
/// Minimal shape check only; persistence is best-effort and invisible to the
/// caller, so the response is 200 even when the sink is unavailable. A
/// missing field takes the same 400 path as a malformed address.
pub async fn handle_save_email(
    State(state): State<AppState>,
    Json(req): Json<SaveEmailRequest>,
) -> Result<Json<Value>, AppError> {
    let email = req
        .email
        .filter(|e| e.contains('@'))
        .ok_or_else(|| AppError::Validation("Invalid email address.".into()))?;

    state.sink.save_email(&email).await;
    Ok(Json(json!({ "success": true })))
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub rating: Option<i16>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// POST /feedback
pub async fn handle_feedback(
    State(state): State<AppState>,
    Json(req): Json<FeedbackRequest>,
) -> Result<Json<Value>, AppError> {
    let rating = req
        .rating
        .filter(|r| (1..=5).contains(r))
        .ok_or_else(|| AppError::Validation("Rating must be between 1 and 5.".into()))?;

    state
        .sink
        .save_feedback(
            rating,
            req.comment.as_deref().unwrap_or(""),
            req.email.as_deref().unwrap_or(""),
        )
        .await;

    Ok(Json(json!({ "success": true })))
}
