use crate::errors::CompletionError;
use crate::extract::ExtractorRegistry;
use crate::prompts::PromptStrategy;
use crate::providers::ai::CompletionProvider;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;

/// The outcome of one completion call.
///
/// `had_candidate` records whether the service produced any candidate at
/// all; consumers must check it before using `raw_text`. An empty candidate
/// list is a valid, non-exceptional response meaning "no answer produced".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionResult {
    pub raw_text: String,
    pub had_candidate: bool,
}

/// A client that runs the full ask pipeline: extraction, prompt assembly,
/// completion, and optional document rendering.
///
/// All configuration is passed in explicitly through the builder; there is
/// no process-global client state. Each request's intermediate values are
/// owned by the call and released when it returns.
pub struct AskClient {
    pub(crate) provider: Box<dyn CompletionProvider>,
    pub(crate) registry: Arc<ExtractorRegistry>,
}

impl fmt::Debug for AskClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AskClient")
            .field("provider", &self.provider)
            .field("registry", &self.registry)
            .finish()
    }
}

/// A builder for creating [`AskClient`] instances.
#[derive(Default)]
pub struct AskClientBuilder {
    provider: Option<Box<dyn CompletionProvider>>,
    registry: Option<Arc<ExtractorRegistry>>,
}

impl AskClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the completion provider. Required.
    pub fn completion_provider(mut self, provider: Box<dyn CompletionProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Sets the extractor registry. A client built without one can still
    /// answer questions, but every upload fails as unsupported.
    pub fn extractor_registry(mut self, registry: Arc<ExtractorRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Builds the [`AskClient`].
    pub fn build(self) -> Result<AskClient, CompletionError> {
        let provider = self.provider.ok_or(CompletionError::MissingProvider)?;
        Ok(AskClient {
            provider,
            registry: self
                .registry
                .unwrap_or_else(|| Arc::new(ExtractorRegistry::new())),
        })
    }
}

/// Per-request options for [`AskClient::ask`](crate::AskClient::ask).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AskOptions {
    /// The user's question (or pasted code, for the few-shot strategy).
    pub question: String,
    /// An optional persona wrapped around the assembled prompt.
    #[serde(default)]
    pub persona: Option<String>,
    /// Ordered few-shot examples; only the few-shot strategy reads them.
    #[serde(default)]
    pub examples: Vec<String>,
    /// Which prompt shape to assemble.
    #[serde(default)]
    pub strategy: PromptStrategy,
    /// When set, the answer is also rendered to a downloadable document.
    #[serde(default)]
    pub render_document: bool,
    /// Title for the rendered document.
    #[serde(default)]
    pub document_title: Option<String>,
    /// When set, a tip callout with this text is appended to the rendered
    /// document.
    #[serde(default)]
    pub document_tip: Option<String>,
}
