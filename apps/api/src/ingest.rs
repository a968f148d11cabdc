//! Document ingestion — turns pasted text or an uploaded `.txt` / `.pdf`
//! into the single string the extraction pipeline reads.
//!
//! Ingestion never fails outright. Problems come back as
//! [`Ingested::Failed`] carrying a sentinel message in place of the
//! document text, which the response echoes back. Raw text that arrives
//! without this tag is screened with [`is_sentinel`] instead.

use bytes::Bytes;
use tracing::{info, warn};

pub const PDF_ERROR_PREFIX: &str = "Error processing PDF:";
pub const TEXT_ERROR_PREFIX: &str = "Error decoding text file:";
pub const UNSUPPORTED_FILE: &str = "Unsupported file type. Please upload .txt or .pdf files.";
pub const NO_INPUT: &str = "No input provided.";

const SENTINEL_PREFIXES: &[&str] = &[
    PDF_ERROR_PREFIX,
    TEXT_ERROR_PREFIX,
    UNSUPPORTED_FILE,
    NO_INPUT,
];

/// Outcome of ingestion. Both variants carry the text echoed to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ingested {
    /// Document text, pasted or decoded from an upload.
    Document(String),
    /// A sentinel message describing why no document text is available.
    Failed(String),
}

impl Ingested {
    pub fn text(&self) -> &str {
        match self {
            Ingested::Document(text) | Ingested::Failed(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Ingested::Document(text) | Ingested::Failed(text) => text,
        }
    }
}

/// An uploaded file as received from the multipart form.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub data: Bytes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    Text,
    Pdf,
    Unsupported,
}

impl FileKind {
    fn from_filename(filename: &str) -> Self {
        let lower = filename.to_ascii_lowercase();
        if lower.ends_with(".txt") {
            FileKind::Text
        } else if lower.ends_with(".pdf") {
            FileKind::Pdf
        } else {
            FileKind::Unsupported
        }
    }
}

/// True when `text` is an ingestion failure message rather than a document.
pub fn is_sentinel(text: &str) -> bool {
    SENTINEL_PREFIXES.iter().any(|p| text.starts_with(p))
}

/// Resolves the request's input to document text. Non-empty pasted text
/// takes precedence over an uploaded file.
///
/// CPU-bound for PDFs; call from `spawn_blocking`.
pub fn ingest(pasted_text: Option<String>, upload: Option<Upload>) -> Ingested {
    if let Some(text) = pasted_text.filter(|t| !t.is_empty()) {
        return Ingested::Document(text);
    }

    let Some(upload) = upload else {
        return Ingested::Failed(NO_INPUT.to_string());
    };

    match FileKind::from_filename(&upload.filename) {
        FileKind::Text => match String::from_utf8(upload.data.to_vec()) {
            Ok(text) => Ingested::Document(text),
            Err(e) => {
                warn!("Upload {} is not valid UTF-8: {e}", upload.filename);
                Ingested::Failed(format!("{TEXT_ERROR_PREFIX} {e}"))
            }
        },
        FileKind::Pdf => match pdf_to_text(&upload.data) {
            Ok(text) => {
                info!(
                    "Extracted {} chars from PDF {}",
                    text.len(),
                    upload.filename
                );
                Ingested::Document(text)
            }
            Err(detail) => {
                warn!("PDF extraction failed for {}: {detail}", upload.filename);
                Ingested::Failed(format!("{PDF_ERROR_PREFIX} {detail}"))
            }
        },
        FileKind::Unsupported => Ingested::Failed(UNSUPPORTED_FILE.to_string()),
    }
}

/// `pdf-extract` panics on some malformed inputs; those are reported like
/// any other decode failure.
fn pdf_to_text(data: &[u8]) -> Result<String, String> {
    match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(data)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err("PDF parser aborted on malformed input".to_string()),
    }
}
