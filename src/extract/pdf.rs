//! PDF text extraction.

use crate::error::{Result, StudyError};
use tracing::{debug, instrument};

/// Whether an uploaded file name looks like a PDF.
pub fn is_pdf_filename(name: &str) -> bool {
    name.to_lowercase().ends_with(".pdf")
}

/// Extract the text of every page, in page order.
///
/// Parsing is CPU-bound, so it runs on the blocking pool.
#[instrument(skip_all, fields(bytes = bytes.len()))]
pub async fn extract_pdf_text(bytes: Vec<u8>) -> Result<String> {
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| StudyError::Extraction(format!("PDF worker failed: {}", e)))?
        .map_err(|e| StudyError::Extraction(format!("Failed to extract PDF text: {}", e)))?;

    // Page breaks come through as form feeds.
    let text = text.replace('\u{000C}', "\n").trim().to_string();
    debug!("Extracted {} characters", text.chars().count());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pdf_filename() {
        assert!(is_pdf_filename("notes.pdf"));
        assert!(is_pdf_filename("Lecture 3.PDF"));
        assert!(!is_pdf_filename("notes.pdf.txt"));
        assert!(!is_pdf_filename("notes"));
    }

    #[tokio::test]
    async fn test_garbage_is_extraction_error() {
        let result = extract_pdf_text(b"definitely not a pdf".to_vec()).await;
        assert!(matches!(result, Err(StudyError::Extraction(_))));
    }
}
