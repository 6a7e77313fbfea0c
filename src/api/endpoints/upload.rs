//! Upload endpoints: spreadsheet validation and import, document OCR and
//! the import template download.
//!
//! Files arrive as multipart form data and are processed in memory. The
//! router's body limit caps them at [`crate::config::MAX_UPLOAD_BYTES`].

use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::documents::{analyze_text, DocumentCapture};
use crate::pipeline::import::{
    detect_image_format, import_sheet, is_spreadsheet_upload, read_sheet, template_workbook,
    validate_sheet, ImportSummary, Sheet, ValidationOutcome, ValidationReport, TEMPLATE_FILENAME,
};

/// Multipart field carrying the spreadsheet.
const SPREADSHEET_FIELD: &str = "excel";
/// Multipart field carrying the document photo.
const DOCUMENT_FIELD: &str = "documento";

struct UploadedFile {
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Bytes,
}

/// Pull the named file field out of a multipart body, skipping other fields.
async fn take_file_field(
    multipart: &mut Multipart,
    field_name: &str,
) -> Result<Option<UploadedFile>, ApiError> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(None),
            Err(e) => {
                tracing::warn!(error = %e, "Malformed multipart upload");
                return Err(ApiError::BadRequest(format!(
                    "Falha ao ler o upload: {}",
                    e.body_text()
                )));
            }
        };

        if field.name().unwrap_or("") != field_name {
            continue;
        }

        let file_name = field.file_name().map(String::from);
        let content_type = field.content_type().map(String::from);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Falha ao ler o upload: {}", e.body_text())))?;

        if bytes.is_empty() {
            return Ok(None);
        }

        return Ok(Some(UploadedFile {
            file_name,
            content_type,
            bytes,
        }));
    }
}

async fn read_uploaded_sheet(multipart: &mut Multipart) -> Result<Sheet, ApiError> {
    let file = take_file_field(multipart, SPREADSHEET_FIELD)
        .await?
        .ok_or_else(|| ApiError::BadRequest("Nenhum arquivo foi enviado".into()))?;

    if !is_spreadsheet_upload(file.file_name.as_deref(), file.content_type.as_deref()) {
        return Err(ApiError::BadRequest(
            "Apenas arquivos Excel (.xlsx, .xls) são permitidos".into(),
        ));
    }

    tracing::debug!(
        file_name = file.file_name.as_deref().unwrap_or(""),
        size = file.bytes.len(),
        "Spreadsheet received"
    );
    Ok(read_sheet(&file.bytes)?)
}

#[derive(Serialize)]
pub struct ValidationResponse {
    pub message: &'static str,
    #[serde(flatten)]
    pub report: ValidationReport,
}

/// `POST /api/upload/excel/validar`: dry run, nothing is written.
pub async fn validate_spreadsheet(
    State(ctx): State<ApiContext>,
    mut multipart: Multipart,
) -> Result<Json<ValidationResponse>, ApiError> {
    let sheet = read_uploaded_sheet(&mut multipart).await?;
    let conn = ctx.core.open_db()?;

    match validate_sheet(&conn, &sheet)? {
        ValidationOutcome::Valid(report) => Ok(Json(ValidationResponse {
            message: "Arquivo válido",
            report,
        })),
        ValidationOutcome::Invalid {
            errors,
            total_errors,
        } => Err(ApiError::Validation {
            message: "Erros encontrados na validação".into(),
            details: serde_json::json!({
                "errors": errors,
                "total_errors": total_errors,
            }),
        }),
    }
}

#[derive(Serialize)]
pub struct ImportResponse {
    pub message: &'static str,
    #[serde(flatten)]
    pub summary: ImportSummary,
}

/// `POST /api/upload/excel`: register every valid row.
pub async fn import_spreadsheet(
    State(ctx): State<ApiContext>,
    mut multipart: Multipart,
) -> Result<Json<ImportResponse>, ApiError> {
    let sheet = read_uploaded_sheet(&mut multipart).await?;
    let conn = ctx.core.open_db()?;
    let summary = import_sheet(&conn, &sheet)?;

    tracing::info!(
        companies_created = summary.companies_created,
        persons_created = summary.persons_created,
        rejected = summary.errors.len(),
        "Spreadsheet imported"
    );

    Ok(Json(ImportResponse {
        message: "Importação concluída",
        summary,
    }))
}

#[derive(Serialize)]
pub struct OcrResponse {
    pub texto_completo: String,
    /// Engine confidence, 0.0–1.0.
    pub confianca: f32,
    pub dados_extraidos: DocumentCapture,
    pub linhas_processadas: usize,
}

/// `POST /api/upload/ocr`: read a document photo and prefill registration.
pub async fn ocr_document(
    State(ctx): State<ApiContext>,
    mut multipart: Multipart,
) -> Result<Json<OcrResponse>, ApiError> {
    let file = take_file_field(&mut multipart, DOCUMENT_FIELD)
        .await?
        .ok_or_else(|| ApiError::BadRequest("Nenhuma imagem foi enviada".into()))?;

    let Some(format) = detect_image_format(&file.bytes) else {
        return Err(ApiError::BadRequest(
            "Apenas imagens (JPEG, PNG, GIF) são permitidas".into(),
        ));
    };

    let engine = ctx.core.ocr_engine()?;
    tracing::info!(format = format.mime_type(), size = file.bytes.len(), "Running OCR");

    let bytes = file.bytes;
    let page = tokio::task::spawn_blocking(move || engine.recognize(&bytes))
        .await
        .map_err(|e| ApiError::Internal(format!("OCR task failed: {e}")))??;

    let lines_processed = page.text.lines().filter(|l| !l.trim().is_empty()).count();
    let capture = analyze_text(&page.text);

    Ok(Json(OcrResponse {
        texto_completo: page.text,
        confianca: page.confidence,
        dados_extraidos: capture,
        linhas_processadas: lines_processed,
    }))
}

/// `GET /api/upload/template`: blank import workbook with sample rows.
pub async fn download_template() -> Result<Response, ApiError> {
    let workbook = template_workbook()?;
    let content_type = mime_guess::from_path(TEMPLATE_FILENAME)
        .first_or_octet_stream()
        .to_string();

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{TEMPLATE_FILENAME}\""),
            ),
        ],
        workbook,
    )
        .into_response())
}
