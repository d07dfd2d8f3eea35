//! # `askdoc-pdf`: PDF Extraction Plugin
//!
//! This crate provides text extraction for PDF uploads as a self-contained
//! plugin for the `askdoc` ecosystem. It implements the `Extractor` trait
//! from the core `askdoc` library.
//!
//! Pages are visited in document order and their text is concatenated with
//! no separator, so callers should not assume paragraph boundaries are
//! preserved.

use askdoc::extract::{ExtractError, Extractor};
use async_trait::async_trait;
use pdf::file::FileOptions;
use thiserror::Error;
use tracing::debug;

/// Custom error types for the PDF extraction process.
#[derive(Error, Debug)]
pub enum PdfExtractError {
    #[error("Failed to parse PDF content: {0}")]
    PdfParse(String),
}

impl From<PdfExtractError> for ExtractError {
    fn from(err: PdfExtractError) -> Self {
        match err {
            PdfExtractError::PdfParse(s) => ExtractError::Parse(s),
        }
    }
}

/// Extracts text from all pages of a PDF synchronously.
///
/// Malformed and encrypted documents fail at load time.
fn extract_text_from_pdf(pdf_data: &[u8]) -> Result<String, PdfExtractError> {
    let file = FileOptions::cached()
        .load(pdf_data)
        .map_err(|e| PdfExtractError::PdfParse(e.to_string()))?;
    let resolver = file.resolver();
    let mut full_text = String::new();

    for page_num in 0..file.num_pages() {
        let page = file
            .get_page(page_num)
            .map_err(|e| PdfExtractError::PdfParse(e.to_string()))?;
        if let Some(content) = &page.contents {
            let operations = content
                .operations(&resolver)
                .map_err(|e| PdfExtractError::PdfParse(e.to_string()))?;
            for op in operations.iter() {
                if let pdf::content::Op::TextDraw { text } = op {
                    full_text.push_str(&text.to_string_lossy());
                }
            }
        }
    }
    debug!(pages = file.num_pages(), "Extracted PDF text");
    Ok(full_text)
}

/// The `Extractor` implementation for PDF uploads.
pub struct PdfExtractor;

#[async_trait]
impl Extractor for PdfExtractor {
    async fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        Ok(extract_text_from_pdf(bytes).map_err(ExtractError::from)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use askdoc_test_utils::helpers::generate_test_pdf;

    #[tokio::test]
    async fn single_page_pdf_returns_exactly_the_page_text() {
        let pdf_bytes = generate_test_pdf("The quarterly report is due Friday.").unwrap();
        let text = PdfExtractor.extract(&pdf_bytes).await.unwrap();
        assert_eq!(text, "The quarterly report is due Friday.");
    }

    #[tokio::test]
    async fn garbage_bytes_are_a_parse_error() {
        let err = PdfExtractor
            .extract(b"definitely not a pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::Parse(_)));
    }
}
