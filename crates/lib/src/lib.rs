//! # askdoc
//!
//! This crate provides a client that answers natural-language questions
//! about uploaded documents using a configurable completion provider:
//! per-format extractors normalize heterogeneous uploads into plain text, a
//! deterministic assembler builds the prompt, and the generated answer can
//! be rendered into a downloadable Word-processing document.

pub mod errors;
pub mod extract;
pub mod pipeline;
pub mod prompts;
pub mod providers;
pub mod types;

pub use errors::CompletionError;
pub use pipeline::{
    AskError, AskOutcome, RenderedDocument, Stage, StreamingAsk, DEFAULT_DOCUMENT_TITLE,
    NO_RESPONSE_MESSAGE,
};
pub use types::{AskClient, AskClientBuilder, AskOptions, CompletionResult};

use crate::extract::{extract_batch, ExtractError, ExtractionWarning, UploadedDocument};
use crate::pipeline::StageError;
use crate::prompts::PromptRequest;
use anyhow::anyhow;
use tracing::{debug, info};

impl AskClient {
    /// Runs the full pipeline for one request: extraction, prompt
    /// assembly, completion, and (when requested) document rendering.
    ///
    /// Transitions are linear. A per-file extraction failure only produces
    /// a warning; a batch where every file failed, a completion-service
    /// error, or a rendering failure moves the request to `Failed` with
    /// the originating error attached. There are no automatic retries.
    pub async fn ask(
        &self,
        documents: Vec<UploadedDocument>,
        options: AskOptions,
    ) -> Result<AskOutcome, AskError> {
        let (prompt_text, warnings) = self.prepare(&documents, &options).await?;

        let completion = self
            .provider
            .complete(&prompt_text)
            .await
            .map_err(|e| AskError::new(Stage::Completing, e))?;

        if !completion.had_candidate {
            info!("Completion service returned no candidates.");
            return Ok(AskOutcome {
                answer: NO_RESPONSE_MESSAGE.to_string(),
                had_candidate: false,
                warnings,
                rendered_document: None,
                stage: Stage::Done,
            });
        }

        let rendered_document = if options.render_document {
            let title = options
                .document_title
                .as_deref()
                .unwrap_or(DEFAULT_DOCUMENT_TITLE);
            let bytes = askdoc_render::render_generated_document(
                title,
                &completion.raw_text,
                options.document_tip.as_deref(),
            )
            .map_err(|e| AskError::new(Stage::Rendering, e))?;
            Some(RenderedDocument {
                file_name: assign_file_name(title),
                bytes,
            })
        } else {
            None
        };

        Ok(AskOutcome {
            answer: completion.raw_text,
            had_candidate: true,
            warnings,
            rendered_document,
            stage: Stage::Done,
        })
    }

    /// Runs the pipeline up to the completion call and returns the
    /// fragment stream instead of a full answer.
    ///
    /// Fragments must be displayed in arrival order; dropping the stream
    /// cancels the network call. Rendering does not apply to streaming
    /// runs.
    pub async fn ask_stream(
        &self,
        documents: Vec<UploadedDocument>,
        options: AskOptions,
    ) -> Result<StreamingAsk, AskError> {
        let (prompt_text, warnings) = self.prepare(&documents, &options).await?;

        let stream = self
            .provider
            .complete_stream(&prompt_text)
            .await
            .map_err(|e| AskError::new(Stage::Completing, e))?;

        Ok(StreamingAsk { stream, warnings })
    }

    /// The Extracting and Prompting stages, shared by both run modes.
    async fn prepare(
        &self,
        documents: &[UploadedDocument],
        options: &AskOptions,
    ) -> Result<(String, Vec<ExtractionWarning>), AskError> {
        debug!(stage = ?Stage::Extracting, files = documents.len(), "Extracting uploads");
        let batch = extract_batch(&self.registry, documents).await;
        if !documents.is_empty() && batch.documents.is_empty() {
            let failure: StageError = ExtractError::Internal(anyhow!(
                "all {} uploaded documents failed extraction",
                documents.len()
            ))
            .into();
            return Err(AskError {
                stage: Stage::Extracting,
                source: failure,
            });
        }

        // Prompting: pure assembly, deterministic for the same inputs.
        let context_text = (!batch.combined_text.is_empty()).then_some(batch.combined_text);
        let request = PromptRequest::new(&options.question)
            .persona(options.persona.clone())
            .context_text(context_text)
            .examples(options.examples.clone())
            .assemble(options.strategy);
        debug!(stage = ?Stage::Prompting, prompt_len = request.final_text().len(), "Assembled prompt");

        Ok((request.final_text().to_string(), batch.warnings))
    }
}

/// Assigns the download filename for a rendered document.
fn assign_file_name(title: &str) -> String {
    let slug: String = title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    let slug = slug.trim_matches('_');
    format!(
        "{}_{}.docx",
        if slug.is_empty() { "document" } else { slug },
        chrono::Utc::now().format("%Y%m%d_%H%M%S")
    )
}
