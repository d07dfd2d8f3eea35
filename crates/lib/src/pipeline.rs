//! # Pipeline States and Outcomes
//!
//! A request moves linearly through the stages below; there are no retries
//! and no backtracking. Any failure moves the request to `Failed` carrying
//! the originating error and the stage it arose in. `Done` and `Failed`
//! are terminal.

use crate::errors::CompletionError;
use crate::extract::{ExtractError, ExtractionWarning};
use askdoc_render::RenderError;
use serde::Serialize;
use thiserror::Error;

/// The message surfaced to the user when the completion service returns an
/// empty candidate list.
pub const NO_RESPONSE_MESSAGE: &str = "No response from the model.";

/// The document title used when the caller does not assign one.
pub const DEFAULT_DOCUMENT_TITLE: &str = "Generated Answer";

/// The states of the ask pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    AwaitingInput,
    Extracting,
    Prompting,
    Completing,
    Rendering,
    Done,
    Failed,
}

/// The error of whichever layer a stage failed in.
#[derive(Error, Debug)]
pub enum StageError {
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Completion(#[from] CompletionError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// A pipeline failure, tagged with the stage it arose in.
#[derive(Error, Debug)]
#[error("pipeline failed while {stage:?}: {source}")]
pub struct AskError {
    pub stage: Stage,
    #[source]
    pub source: StageError,
}

impl AskError {
    pub(crate) fn new(stage: Stage, source: impl Into<StageError>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }
}

/// A document rendered from the generated answer, ready for download.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// The terminal result of a successful pipeline run.
#[derive(Debug)]
pub struct AskOutcome {
    /// The generated answer, or [`NO_RESPONSE_MESSAGE`] when the service
    /// produced no candidate.
    pub answer: String,
    /// Whether the service produced any candidate.
    pub had_candidate: bool,
    /// Per-file extraction failures that did not abort the request.
    pub warnings: Vec<ExtractionWarning>,
    /// Present when the caller requested a rendered document and the
    /// service produced an answer.
    pub rendered_document: Option<RenderedDocument>,
    /// Always [`Stage::Done`]; carried so callers can report the terminal
    /// state uniformly.
    pub stage: Stage,
}

/// The result of starting a streaming pipeline run: extraction warnings are
/// known up front, fragments arrive lazily.
pub struct StreamingAsk {
    pub stream: crate::providers::ai::CompletionStream,
    pub warnings: Vec<ExtractionWarning>,
}
