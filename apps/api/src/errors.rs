use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::imaging::RenderError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Validation(msg) => AppError::Validation(msg),
            other => AppError::Render(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                error_body("VALIDATION_ERROR", msg, None),
            ),
            AppError::Render(details) => {
                tracing::error!("Render error: {details}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_body("RENDER_ERROR", "Failed to generate images", Some(details)),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_body(
                        "INTERNAL_ERROR",
                        "An internal server error occurred",
                        None,
                    ),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

fn error_body(code: &str, message: &str, details: Option<&str>) -> Value {
    let mut error = json!({
        "code": code,
        "message": message
    });
    if let Some(details) = details {
        error["details"] = json!(details);
    }
    json!({ "error": error })
}
