use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::AppError;
use crate::extraction::orchestrator::{extract, extract_document, ExtractionRecord};
use crate::ingest::{ingest, Ingested, Upload};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExtractTextRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractResponse {
    /// The ingested document text, or the ingestion failure message.
    pub text: String,
    pub extracted_info: ExtractionRecord,
}

/// Fields accepted by the upload form. Both are optional.
#[derive(Debug, Default)]
struct UploadForm {
    pasted_text: Option<String>,
    file: Option<Upload>,
}

async fn parse_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "pasted_text" => {
                form.pasted_text = Some(field.text().await?);
            }
            "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let data = field.bytes().await?;
                // Browsers send an empty, unnamed part when no file was chosen.
                if !(filename.is_empty() && data.is_empty()) {
                    form.file = Some(Upload { filename, data });
                }
            }
            other => debug!("Ignoring unknown form field '{other}'"),
        }
    }

    Ok(form)
}

/// POST /api/v1/extract
///
/// Multipart form with optional `pasted_text` and `file` parts. Ingestion
/// and extraction run on the blocking pool: PDF decoding is CPU-bound and the
/// remote recognizer blocks on HTTP.
pub async fn handle_extract_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    let form = parse_form(multipart).await?;
    let vocabulary = state.vocabulary.clone();
    let recognizer = state.recognizer.clone();

    let response = tokio::task::spawn_blocking(move || {
        let ingested = ingest(form.pasted_text, form.file);
        let extracted_info = match &ingested {
            Ingested::Document(text) => {
                extract_document(text, recognizer.as_ref(), &vocabulary)
            }
            Ingested::Failed(_) => {
                debug!("Ingestion failed, returning empty record: {}", ingested.text());
                ExtractionRecord::default()
            }
        };
        ExtractResponse {
            text: ingested.into_text(),
            extracted_info,
        }
    })
    .await
    .map_err(|e| {
        AppError::Internal(anyhow::anyhow!("spawn_blocking failed in extraction: {e}"))
    })?;

    info!(
        "Extraction complete: {} chars, empty record: {}",
        response.text.len(),
        response.extracted_info.is_empty()
    );
    Ok(Json(response))
}

/// POST /api/v1/extract/text
pub async fn handle_extract_text(
    State(state): State<AppState>,
    Json(req): Json<ExtractTextRequest>,
) -> Result<Json<ExtractionRecord>, AppError> {
    let vocabulary = state.vocabulary.clone();
    let recognizer = state.recognizer.clone();

    let record =
        tokio::task::spawn_blocking(move || extract(&req.text, recognizer.as_ref(), &vocabulary))
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("spawn_blocking failed in extraction: {e}"))
            })?;

    Ok(Json(record))
}
