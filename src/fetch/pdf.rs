// src/fetch/pdf.rs
// =============================================================================
// Text extraction for PDF editorials.
//
// Some contests (mostly gyms and older rounds) publish the editorial as a PDF
// attached to the contest. pdf-extract walks every page and returns plain text,
// which is all the LLM needs.
// =============================================================================

use tracing::debug;

use crate::error::{EditorialError, Result};

// Extracts the text of all pages
//
// Parsing is CPU-bound and pdf-extract can panic on malformed files, so it
// runs on the blocking pool where a panic surfaces as a JoinError.
pub async fn extract_text(bytes: Vec<u8>) -> Result<String> {
    let size = bytes.len();

    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| EditorialError::Parsing(format!("PDF parser crashed: {}", e)))?
        .map_err(|e| EditorialError::Parsing(format!("Failed to read PDF: {}", e)))?;

    debug!(bytes = size, chars = text.len(), "extracted PDF text");

    if text.trim().is_empty() {
        return Err(EditorialError::Parsing(
            "PDF contains no extractable text (scanned document?)".to_string(),
        ));
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_extracts_page_text() {
        let text = extract_text(crate::testing::pdf_with_text("Problem A: sort then binary search"))
            .await
            .unwrap();
        assert!(text.contains("binary search"), "got {:?}", text);
    }

    #[tokio::test]
    async fn test_garbage_is_parsing_error() {
        let err = extract_text(b"definitely not a pdf".to_vec()).await.unwrap_err();
        assert!(matches!(err, EditorialError::Parsing(_)));
    }
}
