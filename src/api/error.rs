//! API error types with structured JSON responses.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::core_state::CoreError;
use crate::db::DatabaseError;
use crate::pipeline::import::{ImportError, REQUIRED_COLUMNS};
use crate::pipeline::ocr::OcrError;

/// Error response body: `{"error": "<message>", "code": "...", ...details}`.
///
/// `error` stays a plain string and detail keys (`errors`, `total_errors`,
/// `required`, `found`) sit at the top level, where the web client reads them.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
    #[serde(flatten)]
    pub details: Option<serde_json::Map<String, serde_json::Value>>,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    /// Rejected input with machine-readable details for the client.
    /// `details` must be a JSON object; its keys are merged into the body.
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        details: serde_json::Value,
    },
    #[error("OCR engine not configured")]
    OcrUnavailable,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, "NOT_FOUND", detail, None),
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail, None),
            ApiError::Validation { message, details } => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_FAILED",
                message,
                Some(details),
            ),
            ApiError::OcrUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "OCR_UNAVAILABLE",
                "OCR não está disponível neste servidor".to_string(),
                None,
            ),
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let details = details.map(|value| match value {
            serde_json::Value::Object(map) => map,
            other => {
                let mut map = serde_json::Map::new();
                map.insert("details".into(), other);
                map
            }
        });
        let body = ErrorBody {
            error: message,
            code,
            details,
        };
        (status, Json(body)).into_response()
    }
}

/// User-facing "not found" message for a repository entity.
fn not_found_message(entity_type: &str) -> String {
    match entity_type {
        "empresa" => "Empresa não encontrada",
        "pessoa" => "Pessoa não encontrada",
        "checkin" => "Check-in não encontrado",
        _ => "Registro não encontrado",
    }
    .to_string()
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { entity_type, .. } => ApiError::NotFound(not_found_message(&entity_type)),
            DatabaseError::ConstraintViolation(message) => ApiError::BadRequest(message),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Database(e) => e.into(),
            CoreError::OcrUnavailable => ApiError::OcrUnavailable,
        }
    }
}

impl From<rusqlite::Error> for ApiError {
    fn from(err: rusqlite::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::EmptySheet => ApiError::BadRequest(err.to_string()),
            ImportError::Unreadable(_) => ApiError::BadRequest(err.to_string()),
            ImportError::MissingColumns { ref found, .. } => ApiError::Validation {
                details: serde_json::json!({
                    "required": REQUIRED_COLUMNS,
                    "found": found,
                }),
                message: err.to_string(),
            },
            ImportError::Database(e) => e.into(),
            ImportError::Workbook(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<OcrError> for ApiError {
    fn from(err: OcrError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Dados inválidos: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(format!("Parâmetro inválido: {}", rejection.body_text()))
    }
}
