//! # `askdoc-text`: Plain-Text and Markdown Extraction Plugin
//!
//! This crate provides text extraction for `text/plain` and
//! `text/markdown` uploads as a self-contained plugin for the `askdoc`
//! ecosystem. It implements the `Extractor` trait from the core `askdoc`
//! library. Both formats decode the same way: the uploaded bytes must be
//! valid UTF-8, and Markdown markers are left in place for the downstream
//! renderer.

use askdoc::extract::{ExtractError, Extractor};
use async_trait::async_trait;
use thiserror::Error;

/// Custom error types for the text extraction process.
#[derive(Error, Debug)]
pub enum TextExtractError {
    #[error("Document bytes are not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// A helper to convert the specific `TextExtractError` into the generic
/// `askdoc::extract::ExtractError`.
impl From<TextExtractError> for ExtractError {
    fn from(err: TextExtractError) -> Self {
        match err {
            TextExtractError::InvalidUtf8(e) => ExtractError::Decode(e),
        }
    }
}

/// Decodes the uploaded bytes strictly.
///
/// Invalid sequences are surfaced to the caller; they are never silently
/// replaced with the replacement character.
fn decode_utf8(bytes: &[u8]) -> Result<String, TextExtractError> {
    Ok(String::from_utf8(bytes.to_vec())?)
}

/// The `Extractor` implementation for `text/plain` uploads.
pub struct PlainTextExtractor;

#[async_trait]
impl Extractor for PlainTextExtractor {
    async fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        Ok(decode_utf8(bytes).map_err(ExtractError::from)?)
    }
}

/// The `Extractor` implementation for `text/markdown` uploads.
pub struct MarkdownExtractor;

#[async_trait]
impl Extractor for MarkdownExtractor {
    async fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        Ok(decode_utf8(bytes).map_err(ExtractError::from)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn valid_utf8_round_trips() {
        let text = PlainTextExtractor
            .extract("plain notes, no surprises".as_bytes())
            .await
            .unwrap();
        assert_eq!(text, "plain notes, no surprises");
    }

    #[tokio::test]
    async fn markdown_markers_are_preserved() {
        let text = MarkdownExtractor
            .extract(b"# Title\n**bold** body")
            .await
            .unwrap();
        assert_eq!(text, "# Title\n**bold** body");
    }

    #[tokio::test]
    async fn invalid_utf8_is_a_decode_error() {
        let err = PlainTextExtractor
            .extract(&[0xf0, 0x28, 0x8c, 0x28])
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::Decode(_)));
    }
}
