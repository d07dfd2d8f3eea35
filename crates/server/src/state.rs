//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the
//! logic for building it at startup: one completion provider instantiated
//! from the configuration, and the extractor registry covering every
//! supported upload format. All of it is passed in explicitly; there is no
//! ambient singleton holding the API key.

use crate::config::Config;
use askdoc::{
    extract::{DocumentKind, ExtractorRegistry},
    providers::ai::{gemini::GeminiProvider, local::LocalAiProvider, CompletionProvider},
    AskClient, AskClientBuilder,
};
use askdoc_docx::DocxExtractor;
use askdoc_pdf::PdfExtractor;
use askdoc_sheets::SheetExtractor;
use askdoc_text::{MarkdownExtractor, PlainTextExtractor};
use std::sync::Arc;

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<AskClient>,
}

/// Builds the extractor registry for every supported document kind.
fn build_registry() -> ExtractorRegistry {
    let mut registry = ExtractorRegistry::new();
    registry.register(DocumentKind::PlainText, Box::new(PlainTextExtractor));
    registry.register(DocumentKind::Markdown, Box::new(MarkdownExtractor));
    registry.register(DocumentKind::Pdf, Box::new(PdfExtractor));
    registry.register(DocumentKind::WordDocument, Box::new(DocxExtractor));
    registry.register(DocumentKind::Spreadsheet, Box::new(SheetExtractor));
    registry
}

/// Builds the shared application state from the configuration.
pub fn build_app_state(config: Config) -> anyhow::Result<AppState> {
    let provider: Box<dyn CompletionProvider> = match config.ai_provider.as_str() {
        "gemini" => {
            let api_key = config
                .ai_api_key
                .clone()
                .ok_or_else(|| anyhow::anyhow!("AI_API_KEY is required for the gemini provider"))?;
            // If the URL is not provided, construct it from the model name.
            let api_url = config.ai_api_url.clone().unwrap_or_else(|| {
                format!(
                    "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
                    config.ai_model
                )
            });
            Box::new(GeminiProvider::new(api_url, api_key)?)
        }
        "local" => {
            let api_url = config.ai_api_url.clone().ok_or_else(|| {
                anyhow::anyhow!("AI_API_URL is required for the local provider")
            })?;
            Box::new(LocalAiProvider::new(
                api_url,
                config.ai_api_key.clone(),
                Some(config.ai_model.clone()),
            )?)
        }
        other => {
            return Err(anyhow::anyhow!("Unsupported completion provider: {other}"));
        }
    };

    let client = AskClientBuilder::new()
        .completion_provider(provider)
        .extractor_registry(Arc::new(build_registry()))
        .build()?;

    Ok(AppState {
        client: Arc::new(client),
    })
}
