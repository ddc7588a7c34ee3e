//! Document text extraction. `pdf-extract` is CPU-bound and synchronous, so
//! the call is moved off the async runtime.

use bytes::Bytes;

use crate::errors::AppError;

const PDF_MAGIC: &[u8] = b"%PDF";

/// Validates the uploaded document before any write happens.
pub fn validate_document(bytes: &[u8]) -> Result<(), AppError> {
    if bytes.is_empty() {
        return Err(AppError::InvalidDocument("Empty document".to_string()));
    }
    if !bytes.starts_with(PDF_MAGIC) {
        return Err(AppError::InvalidDocument(
            "Only PDF documents are accepted".to_string(),
        ));
    }
    Ok(())
}

/// Extracts plain text from PDF bytes on a blocking worker thread.
pub async fn extract_text(bytes: Bytes) -> Result<String, AppError> {
    let result = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| anyhow::anyhow!("Extraction task panicked: {e}"))?;

    result.map_err(|e| AppError::ExtractionFailed(format!("Failed to parse PDF: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_invalid() {
        let err = validate_document(b"").unwrap_err();
        assert!(matches!(err, AppError::InvalidDocument(_)));
    }

    #[test]
    fn test_non_pdf_document_is_invalid() {
        let err = validate_document(b"plain text resume").unwrap_err();
        assert!(matches!(err, AppError::InvalidDocument(_)));
    }

    #[test]
    fn test_pdf_magic_passes_validation() {
        assert!(validate_document(b"%PDF-1.7 rest of file").is_ok());
    }
}
