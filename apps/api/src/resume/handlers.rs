use axum::{
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::document::{Document, DocumentKind};
use crate::models::record::Record;
use crate::resume::export::{preview, ExportFormat};
use crate::resume::pipeline::{parse_document, ParsedResume};
use crate::state::AppState;

#[derive(Serialize)]
pub struct ParseResponse {
    pub file_name: String,
    pub ocr_used: bool,
    pub preview: String,
    pub result: Record,
}

/// POST /api/v1/resumes/parse
pub async fn handle_parse(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ParseResponse>, AppError> {
    let document = read_upload(multipart).await?;
    let parsed = run_pipeline(&state, &document).await?;

    Ok(Json(ParseResponse {
        file_name: document.file_name,
        ocr_used: parsed.used_ocr(),
        preview: preview(&parsed.text),
        result: parsed.result,
    }))
}

/// POST /api/v1/resumes/parse/csv
pub async fn handle_export_csv(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    export(&state, multipart, ExportFormat::Csv).await
}

/// POST /api/v1/resumes/parse/json
pub async fn handle_export_json(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    export(&state, multipart, ExportFormat::Json).await
}

async fn export(
    state: &AppState,
    multipart: Multipart,
    format: ExportFormat,
) -> Result<Response, AppError> {
    let document = read_upload(multipart).await?;
    let parsed = run_pipeline(state, &document).await?;
    let body = format.render(&parsed.result)?;

    let headers = [
        (header::CONTENT_TYPE, format.content_type().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", format.file_name()),
        ),
    ];
    Ok((headers, body).into_response())
}

/// Runs the pipeline inside an `upload` span so every log line of this
/// request carries the upload id.
async fn run_pipeline(state: &AppState, document: &Document) -> Result<ParsedResume, AppError> {
    let span = info_span!(
        "upload",
        upload_id = %Uuid::new_v4(),
        file_name = %document.file_name,
        kind = document.kind.as_str(),
    );

    async {
        info!(bytes = document.bytes.len(), "upload received");
        parse_document(
            document,
            &state.extractor,
            state.tagger.as_ref(),
            &state.section_options,
        )
        .await
    }
    .instrument(span)
    .await
}

/// Takes the first multipart field that carries a file name.
async fn read_upload(mut multipart: Multipart) -> Result<Document, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };

        let kind = DocumentKind::from_file_name(&file_name)
            .ok_or_else(|| AppError::UnsupportedFormat(file_name.clone()))?;

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Upload could not be read: {e}")))?;

        return Ok(Document::new(file_name, kind, bytes));
    }

    Err(AppError::Validation(
        "Expected a multipart field with a file".to_string(),
    ))
}
