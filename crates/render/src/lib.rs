//! # `askdoc-render`: Markup Parsing and Document Rendering
//!
//! This crate turns generated answer text into a downloadable
//! Word-processing document. Parsing and rendering are decoupled: a
//! single-pass tokenizer produces an ordered sequence of [`MarkupNode`]
//! values, and [`DocumentBuilder`] is a pure mapping from that sequence to
//! styled paragraphs.

pub mod document;
pub mod markup;

pub use document::{CalloutKind, DocumentBuilder};
pub use markup::{tokenize, MarkupNode};

use thiserror::Error;

/// Errors produced while rendering a document.
///
/// The tokenizer degrades on malformed markup instead of failing, so the
/// only failures here are internal: pattern compilation and document
/// packing.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
    #[error("Failed to pack the document: {0}")]
    Pack(String),
}

/// Renders a generated answer into `.docx` bytes: a title, the parsed
/// answer body, and an optional tip callout.
pub fn render_generated_document(
    title: &str,
    body: &str,
    tip: Option<&str>,
) -> Result<Vec<u8>, RenderError> {
    let nodes = tokenize(body)?;
    let mut builder = DocumentBuilder::new().add_title(title).add_nodes(&nodes);
    if let Some(tip) = tip {
        builder = builder.add_callout(CalloutKind::Tip, tip);
    }
    builder.export()
}
