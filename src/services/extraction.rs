use crate::errors::{AppError, AppResult};

pub const PDF_MIME: &str = "application/pdf";
pub const PLAIN_TEXT_MIME: &str = "text/plain";
pub const MARKDOWN_MIME: &str = "text/markdown";

/// Turns an uploaded file into plain text for summarization.
#[derive(Clone, Copy, Debug, Default)]
pub struct DocumentExtractor;

impl DocumentExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn supports(mime_type: &str) -> bool {
        matches!(
            normalize_mime(mime_type).as_str(),
            PDF_MIME | PLAIN_TEXT_MIME | MARKDOWN_MIME
        )
    }

    pub fn extract_text(&self, bytes: &[u8], mime_type: &str) -> AppResult<String> {
        let text = match normalize_mime(mime_type).as_str() {
            PDF_MIME => extract_pdf(bytes)?,
            PLAIN_TEXT_MIME | MARKDOWN_MIME => String::from_utf8(bytes.to_vec()).map_err(|e| {
                AppError::ValidationError(format!("Document is not valid UTF-8: {}", e))
            })?,
            other => {
                return Err(AppError::UnsupportedDocument(format!(
                    "Cannot read '{}' files; please paste the content manually",
                    other
                )))
            }
        };

        if text.trim().is_empty() {
            return Err(AppError::ValidationError(
                "No text could be extracted from the document".to_string(),
            ));
        }
        log::info!("Extracted {} characters from {} document", text.len(), mime_type);
        Ok(text)
    }

    /// PDF parsing is CPU bound, so it runs on the blocking pool.
    pub async fn extract_text_async(&self, bytes: Vec<u8>, mime_type: &str) -> AppResult<String> {
        let extractor = *self;
        let mime_type = mime_type.to_string();
        tokio::task::spawn_blocking(move || extractor.extract_text(&bytes, &mime_type))
            .await
            .map_err(|e| AppError::InternalError(format!("Extraction task failed: {}", e)))?
    }
}

fn normalize_mime(mime_type: &str) -> String {
    mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

fn extract_pdf(bytes: &[u8]) -> AppResult<String> {
    let raw = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| AppError::UnsupportedDocument(format!("Could not read PDF: {}", e)))?;
    Ok(join_pages(&raw))
}

/// pdf-extract separates pages with form feeds.
fn join_pages(raw: &str) -> String {
    raw.split('\x0C')
        .map(str::trim)
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}
