//! # Rich-Text Document Builder
//!
//! A pure mapping from [`MarkupNode`] sequences to styled `.docx`
//! paragraphs. Each node becomes one paragraph; the builder also provides
//! the title and callout blocks used by the generated-document layout.

use crate::{markup::MarkupNode, RenderError};
use docx_rs::{
    AlignmentType, Docx, Paragraph, Run, RunFonts, Style, StyleType,
};
use std::io::Cursor;
use tracing::debug;

const CODE_FONT: &str = "Courier New";

/// The flavor of a callout block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalloutKind {
    Tip,
    Warning,
}

impl CalloutKind {
    fn label(&self) -> &'static str {
        match self {
            Self::Tip => "TIP:",
            Self::Warning => "WARNING:",
        }
    }
}

/// Builds a Word-processing document paragraph by paragraph and exports it
/// to bytes in memory. The document is owned by the rendering call and
/// handed to the caller; nothing is retained.
pub struct DocumentBuilder {
    docx: Docx,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentBuilder {
    pub fn new() -> Self {
        let docx = Docx::new()
            .add_style(
                Style::new("Title", StyleType::Paragraph)
                    .name("Title")
                    .size(56),
            )
            .add_style(
                Style::new("Heading1", StyleType::Paragraph)
                    .name("Heading 1")
                    .size(32)
                    .bold(),
            )
            .add_style(
                Style::new("Heading3", StyleType::Paragraph)
                    .name("Heading 3")
                    .size(24)
                    .bold(),
            );
        Self { docx }
    }

    /// Adds the document title paragraph.
    pub fn add_title(mut self, text: &str) -> Self {
        self.docx = self.docx.add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(text))
                .style("Title"),
        );
        self
    }

    /// Maps one node to one styled paragraph.
    pub fn add_node(mut self, node: &MarkupNode) -> Self {
        let paragraph = match node {
            MarkupNode::Heading { text, .. } => Paragraph::new()
                .add_run(Run::new().add_text(text.as_str()))
                .style("Heading1"),
            MarkupNode::Bold(text) => {
                Paragraph::new().add_run(Run::new().add_text(text.as_str()).bold())
            }
            MarkupNode::Italic(text) => {
                Paragraph::new().add_run(Run::new().add_text(text.as_str()).italic())
            }
            MarkupNode::Code(text) => Paragraph::new().add_run(
                Run::new()
                    .add_text(text.as_str())
                    .fonts(RunFonts::new().ascii(CODE_FONT)),
            ),
            MarkupNode::PlainText(text) => {
                Paragraph::new().add_run(Run::new().add_text(text.as_str()))
            }
        };
        self.docx = self.docx.add_paragraph(paragraph);
        self
    }

    /// Maps an ordered node sequence to paragraphs, in order.
    pub fn add_nodes(self, nodes: &[MarkupNode]) -> Self {
        nodes.iter().fold(self, |builder, node| builder.add_node(node))
    }

    /// Adds a tip or warning callout block.
    ///
    /// The block is three paragraphs: the text in centered italics, the
    /// kind's label in the small heading style, and the same text again in
    /// bold. The repetition is the callout's layout rule, reproduced from
    /// the reference documents this renderer must stay compatible with.
    pub fn add_callout(mut self, kind: CalloutKind, text: &str) -> Self {
        self.docx = self
            .docx
            .add_paragraph(
                Paragraph::new()
                    .add_run(Run::new().add_text(text).italic())
                    .align(AlignmentType::Center),
            )
            .add_paragraph(
                Paragraph::new()
                    .add_run(Run::new().add_text(kind.label()))
                    .style("Heading3"),
            )
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text(text).bold()));
        self
    }

    /// Packs the document into `.docx` bytes.
    pub fn export(self) -> Result<Vec<u8>, RenderError> {
        let mut cursor = Cursor::new(Vec::new());
        self.docx
            .build()
            .pack(&mut cursor)
            .map_err(|e| RenderError::Pack(e.to_string()))?;
        let bytes = cursor.into_inner();
        debug!(len = bytes.len(), "Packed document");
        Ok(bytes)
    }
}
