//! # Extraction Layer
//!
//! This module defines the contract between the core library and the
//! per-format extractor plugin crates. Each plugin converts one uploaded
//! document format into plain text and maps its own failure modes into the
//! shared [`ExtractError`] taxonomy, which lets the pipeline treat all
//! formats polymorphically.

use async_trait::async_trait;
use futures::future::join_all;
use std::collections::HashMap;
use thiserror::Error;
use tracing::warn;

/// A generic error type for all extractor plugins.
///
/// Each plugin is responsible for mapping its specific errors (e.g. a PDF
/// parser error, an invalid UTF-8 sequence) into these standardized
/// variants.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to decode document bytes as UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    #[error("Failed to parse the document: {0}")]
    Parse(String),

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("An unexpected internal error occurred: {0}")]
    Internal(#[from] anyhow::Error),
}

/// The finite set of document formats the pipeline can extract text from.
///
/// Dispatch is keyed on this enum rather than on raw MIME strings, so an
/// unrecognized declared type is an explicit error instead of a silent
/// no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    PlainText,
    Markdown,
    Pdf,
    WordDocument,
    Spreadsheet,
}

impl DocumentKind {
    /// Maps a declared MIME type to a supported kind.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "text/plain" => Some(Self::PlainText),
            "text/markdown" => Some(Self::Markdown),
            "application/pdf" => Some(Self::Pdf),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Some(Self::WordDocument)
            }
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => {
                Some(Self::Spreadsheet)
            }
            _ => None,
        }
    }

    /// The canonical MIME type for this kind.
    pub fn as_mime(&self) -> &'static str {
        match self {
            Self::PlainText => "text/plain",
            Self::Markdown => "text/markdown",
            Self::Pdf => "application/pdf",
            Self::WordDocument => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Spreadsheet => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

/// A generic trait that defines the contract for an extractor plugin.
///
/// Any crate that provides text extraction for a new document format must
/// implement this trait and register itself in an [`ExtractorRegistry`].
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Converts the raw bytes of one document into plain text.
    async fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError>;
}

/// One uploaded document, as received from the caller.
///
/// Created on upload and discarded when the request completes; nothing is
/// persisted.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// The text extracted from one uploaded document.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub source: String,
    pub text: String,
}

/// A per-file extraction failure that did not abort the batch.
#[derive(Debug, Clone)]
pub struct ExtractionWarning {
    pub source: String,
    pub message: String,
}

/// The result of extracting a batch of uploaded documents.
///
/// `combined_text` concatenates the extracted texts in upload order, with
/// failing files simply omitted. Each failure is reported in `warnings`.
#[derive(Debug, Default)]
pub struct BatchExtraction {
    pub combined_text: String,
    pub documents: Vec<ExtractedDocument>,
    pub warnings: Vec<ExtractionWarning>,
}

/// A registry of extractor plugins keyed by [`DocumentKind`].
#[derive(Default)]
pub struct ExtractorRegistry {
    extractors: HashMap<DocumentKind, Box<dyn Extractor>>,
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an extractor for a document kind, replacing any previous
    /// registration for that kind.
    pub fn register(&mut self, kind: DocumentKind, extractor: Box<dyn Extractor>) {
        self.extractors.insert(kind, extractor);
    }

    /// Extracts the text of a single uploaded document.
    ///
    /// An unrecognized MIME type, or a recognized kind with no registered
    /// extractor, fails with [`ExtractError::UnsupportedFormat`].
    pub async fn extract(&self, document: &UploadedDocument) -> Result<String, ExtractError> {
        let kind = DocumentKind::from_mime(&document.mime_type)
            .ok_or_else(|| ExtractError::UnsupportedFormat(document.mime_type.clone()))?;
        let extractor = self.extractors.get(&kind).ok_or_else(|| {
            ExtractError::UnsupportedFormat(format!("no extractor registered for {kind:?}"))
        })?;
        extractor.extract(&document.bytes).await
    }
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractorRegistry")
            .field("kinds", &self.extractors.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Extracts a batch of uploaded documents concurrently.
///
/// Extractor calls are independent and side-effect-free, so they run
/// concurrently; the combined text still follows upload order. One file's
/// failure never blocks extraction of the others: the failing file's
/// contribution is omitted and reported as a warning.
pub async fn extract_batch(
    registry: &ExtractorRegistry,
    documents: &[UploadedDocument],
) -> BatchExtraction {
    let results = join_all(documents.iter().map(|doc| registry.extract(doc))).await;

    let mut batch = BatchExtraction::default();
    for (document, result) in documents.iter().zip(results) {
        match result {
            Ok(text) => {
                batch.combined_text.push_str(&text);
                batch.documents.push(ExtractedDocument {
                    source: document.file_name.clone(),
                    text,
                });
            }
            Err(e) => {
                warn!(
                    "Extraction failed for '{}': {e}. Continuing with the remaining files.",
                    document.file_name
                );
                batch.warnings.push(ExtractionWarning {
                    source: document.file_name.clone(),
                    message: e.to_string(),
                });
            }
        }
    }
    batch
}
