use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extraction::ExtractionError;
use crate::ner::TaggerError;
use crate::resume::export::ExportError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("No text could be extracted")]
    EmptyExtraction,

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Tagger error: {0}")]
    Tagger(#[from] TaggerError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnsupportedFormat(file_name) => {
                tracing::info!("Rejected upload '{file_name}'");
                (
                    StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    "UNSUPPORTED_FORMAT",
                    "Unsupported file format".to_string(),
                )
            }
            AppError::EmptyExtraction => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EMPTY_EXTRACTION",
                "No text could be extracted from this file.".to_string(),
            ),
            AppError::Extraction(e) => {
                tracing::error!("Extraction error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EXTRACTION_ERROR",
                    "Text could not be extracted from this file".to_string(),
                )
            }
            AppError::Tagger(e) => {
                tracing::error!("Tagger error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "TAGGER_ERROR",
                    "Entity recognition failed".to_string(),
                )
            }
            AppError::Export(e) => {
                tracing::error!("Export error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EXPORT_ERROR",
                    "The result could not be exported".to_string(),
                )
            }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (
                AppError::UnsupportedFormat("cv.txt".into()),
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ),
            (AppError::EmptyExtraction, StatusCode::UNPROCESSABLE_ENTITY),
            (
                AppError::Extraction(ExtractionError::Rasterize("boom".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::Tagger(TaggerError::Service {
                    status: 503,
                    message: "down".into(),
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
