pub mod gemini;
pub mod local;

use crate::errors::CompletionError;
use crate::types::CompletionResult;
use async_trait::async_trait;
use dyn_clone::DynClone;
use futures::stream::Stream;
use std::fmt::Debug;
use std::pin::Pin;

/// A lazy, ordered sequence of generated text fragments.
///
/// Fragments arrive in generation order and must be displayed or
/// concatenated in that order; none is skipped or duplicated. The stream is
/// not restartable, and dropping it cancels the underlying network call.
pub type CompletionStream = Pin<Box<dyn Stream<Item = Result<String, CompletionError>> + Send>>;

/// A trait for interacting with a text-completion service.
///
/// This trait defines a common interface for generating an answer from a
/// single-message prompt using different services (e.g. Gemini, a local
/// OpenAI-compatible endpoint). The model identifier is part of the
/// provider's construction, so a provider instance is bound to one model.
#[async_trait]
pub trait CompletionProvider: Send + Sync + Debug + DynClone {
    /// Sends the assembled prompt and returns the full response.
    ///
    /// An empty candidate list from the service is a valid outcome, not an
    /// error: it yields a [`CompletionResult`] with `had_candidate` unset,
    /// which consumers must check before using `raw_text`.
    async fn complete(&self, prompt: &str) -> Result<CompletionResult, CompletionError>;

    /// Sends the assembled prompt and returns a stream of text fragments
    /// as the service produces them.
    async fn complete_stream(&self, prompt: &str) -> Result<CompletionStream, CompletionError>;
}

dyn_clone::clone_trait_object!(CompletionProvider);
