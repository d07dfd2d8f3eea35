//! # `askdoc-docx`: Word-Document Extraction Plugin
//!
//! This crate provides text extraction for `.docx` uploads as a
//! self-contained plugin for the `askdoc` ecosystem. It implements the
//! `Extractor` trait from the core `askdoc` library.
//!
//! Paragraphs are visited in document order and their run texts are
//! concatenated with no separator, so callers should not assume paragraph
//! boundaries are preserved.

use askdoc::extract::{ExtractError, Extractor};
use async_trait::async_trait;
use docx_rs::{read_docx, DocumentChild, ParagraphChild, RunChild};
use thiserror::Error;
use tracing::debug;

/// Custom error types for the Word-document extraction process.
#[derive(Error, Debug)]
pub enum DocxExtractError {
    #[error("Failed to parse Word document: {0}")]
    DocxParse(String),
}

impl From<DocxExtractError> for ExtractError {
    fn from(err: DocxExtractError) -> Self {
        match err {
            DocxExtractError::DocxParse(s) => ExtractError::Parse(s),
        }
    }
}

/// Extracts the text of every paragraph in document order.
fn extract_text_from_docx(docx_data: &[u8]) -> Result<String, DocxExtractError> {
    let parsed = read_docx(docx_data).map_err(|e| DocxExtractError::DocxParse(e.to_string()))?;

    let mut full_text = String::new();
    let mut paragraphs = 0usize;
    for child in &parsed.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            paragraphs += 1;
            for paragraph_child in &paragraph.children {
                if let ParagraphChild::Run(run) = paragraph_child {
                    for run_child in &run.children {
                        if let RunChild::Text(text) = run_child {
                            full_text.push_str(&text.text);
                        }
                    }
                }
            }
        }
    }
    debug!(paragraphs, "Extracted Word-document text");
    Ok(full_text)
}

/// The `Extractor` implementation for Word-document uploads.
pub struct DocxExtractor;

#[async_trait]
impl Extractor for DocxExtractor {
    async fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        Ok(extract_text_from_docx(bytes).map_err(ExtractError::from)?)
    }
}
