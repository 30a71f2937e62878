use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extraction::ExtractionError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unsupported file type for '{filename}'. Please upload PDF or DOCX.")]
    UnsupportedFormat { filename: String },

    #[error("Error processing file {filename}: {message}")]
    Extraction { filename: String, message: String },

    #[error("Model service is not reachable: {0}")]
    ModelUnreachable(String),

    #[error("Model invocation failed: {0}")]
    ModelInvocation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::UnsupportedFormat { filename } => {
                AppError::UnsupportedFormat { filename }
            }
            ExtractionError::Failed { filename, message } => {
                AppError::Extraction { filename, message }
            }
        }
    }
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::UnsupportedFormat { .. } => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "UNSUPPORTED_FORMAT")
            }
            AppError::Extraction { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "EXTRACTION_FAILED"),
            AppError::ModelUnreachable(_) => (StatusCode::SERVICE_UNAVAILABLE, "MODEL_UNREACHABLE"),
            AppError::ModelInvocation(_) => (StatusCode::BAD_GATEWAY, "MODEL_INVOCATION_FAILED"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            AppError::ModelUnreachable(msg) => {
                tracing::error!("Model service unreachable: {msg}");
                "Ollama server is not running. Please start Ollama and try again.".to_string()
            }
            AppError::ModelInvocation(msg) => {
                tracing::error!("Model invocation failed: {msg}");
                format!("Error during analysis: {msg}")
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
