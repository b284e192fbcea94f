use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::dispatch::DispatchError;
use crate::provider::ProviderError;

/// Application-level error type.
/// Implements `IntoResponse` so handlers can return `Result<T, AppError>`;
/// every error body is a flat `{ "error": string }` object.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad user input: missing document, unsupported format, corrupt file,
    /// too-short text. Detected before any external call; never retried.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The provider API key is not configured for this deployment.
    #[error("Server configuration is missing")]
    Unconfigured,

    /// The single provider call for this request failed.
    #[error("Analysis error: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Unconfigured => {
                tracing::error!("analysis requested but no provider API key is configured");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server configuration is missing. Contact support.".to_string(),
                )
            }
            AppError::Dispatch(e) => {
                tracing::error!("analysis dispatch failed: {e}");
                match e {
                    // "try again later" vs. "fix your deployment" — the caller
                    // can tell them apart by status code.
                    DispatchError::Provider(ProviderError::RateLimited) => (
                        StatusCode::TOO_MANY_REQUESTS,
                        "Usage limit reached. Try again later.".to_string(),
                    ),
                    DispatchError::Provider(ProviderError::Auth(_)) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Authentication with the AI provider failed. Check the server configuration."
                            .to_string(),
                    ),
                    _ => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "The analysis failed. Try again or contact support.".to_string(),
                    ),
                }
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
