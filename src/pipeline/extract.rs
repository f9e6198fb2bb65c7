//! Text extraction: uploaded PDF bytes → plain text.
//!
//! ## Why spawn_blocking?
//!
//! `pdf-extract` walks the full document tree synchronously; a large PDF can
//! hold a worker thread for hundreds of milliseconds. `spawn_blocking` moves
//! the parse onto the blocking pool so the async workers keep serving other
//! requests.
//!
//! ## Validation order
//!
//! Content type, then size, then magic bytes, then the parse itself. The
//! cheap checks run first so a mislabeled or oversized upload is rejected
//! without the parser ever touching the payload.

use crate::config::QuizConfig;
use crate::error::QuizGenError;
use tracing::debug;

/// The only supported upload format.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Extract plain text from uploaded document bytes.
///
/// Page breaks survive as newline separators; the result is trimmed of
/// leading and trailing whitespace. Fails with [`QuizGenError::EmptyDocument`]
/// when nothing but whitespace comes out (typical for scanned, image-only
/// PDFs, which carry no text layer).
pub async fn extract_text(
    bytes: Vec<u8>,
    content_type: &str,
    config: &QuizConfig,
) -> Result<String, QuizGenError> {
    if !is_pdf_content_type(content_type) {
        return Err(QuizGenError::UnsupportedFormat {
            content_type: content_type.to_string(),
        });
    }

    if bytes.len() > config.max_upload_bytes {
        return Err(QuizGenError::SizeLimitExceeded {
            size: bytes.len(),
            limit: config.max_upload_bytes,
        });
    }

    // Magic-byte check ahead of the real parser: a crisp diagnostic beats
    // whatever pdf-extract reports for arbitrary non-PDF bytes.
    if !bytes.starts_with(b"%PDF") {
        return Err(QuizGenError::ExtractionFailed {
            detail: "missing %PDF header".to_string(),
        });
    }

    let size = bytes.len();
    let text = tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem(&bytes)
    })
    .await
    .map_err(|e| QuizGenError::ExtractionFailed {
        detail: format!("extraction task panicked: {e}"),
    })?
    .map_err(|e| QuizGenError::ExtractionFailed {
        detail: e.to_string(),
    })?;

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(QuizGenError::EmptyDocument);
    }

    debug!(bytes = size, chars = text.len(), "Extracted text from PDF");
    Ok(text)
}

/// Match the content type, tolerating mime parameters
/// (`application/pdf; charset=binary`).
fn is_pdf_content_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(str::trim)
        .is_some_and(|essence| essence.eq_ignore_ascii_case(PDF_CONTENT_TYPE))
}
