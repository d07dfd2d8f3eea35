use askdoc::errors::CompletionError;
use askdoc::providers::ai::{CompletionProvider, CompletionStream};
use askdoc::types::CompletionResult;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// --- Mock Completion Provider ---

/// A scriptable completion provider for tests.
///
/// Responses are programmed per prompt substring, calls are recorded for
/// assertion, and the provider can be switched into a "no candidate" mode
/// to exercise the empty-response path.
#[derive(Clone, Debug)]
pub struct MockCompletionProvider {
    responses: Arc<Mutex<HashMap<String, String>>>,
    fragments: Arc<Mutex<Vec<String>>>,
    calls: Arc<Mutex<Vec<String>>>,
    no_candidate: Arc<Mutex<bool>>,
}

impl MockCompletionProvider {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            fragments: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            no_candidate: Arc::new(Mutex::new(false)),
        }
    }

    /// Pre-programs a response for any prompt containing `key`.
    pub fn add_response(&self, key: &str, response: &str) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(key.to_string(), response.to_string());
    }

    /// Pre-programs the fragments yielded by `complete_stream`.
    pub fn add_fragments(&self, fragments: &[&str]) {
        let mut stored = self.fragments.lock().unwrap();
        stored.extend(fragments.iter().map(|f| f.to_string()));
    }

    /// Makes every subsequent call return an empty candidate list.
    pub fn set_no_candidate(&self) {
        *self.no_candidate.lock().unwrap() = true;
    }

    /// Retrieves the recorded prompts for assertion.
    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockCompletionProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionProvider for MockCompletionProvider {
    async fn complete(&self, prompt: &str) -> Result<CompletionResult, CompletionError> {
        self.calls.lock().unwrap().push(prompt.to_string());

        if *self.no_candidate.lock().unwrap() {
            return Ok(CompletionResult {
                raw_text: String::new(),
                had_candidate: false,
            });
        }

        let responses = self.responses.lock().unwrap();
        for (key, response) in responses.iter() {
            if prompt.contains(key) {
                return Ok(CompletionResult {
                    raw_text: response.clone(),
                    had_candidate: true,
                });
            }
        }

        Err(CompletionError::Api(format!(
            "MockCompletionProvider: No response programmed for prompt. Got: '{prompt}'"
        )))
    }

    async fn complete_stream(&self, prompt: &str) -> Result<CompletionStream, CompletionError> {
        self.calls.lock().unwrap().push(prompt.to_string());
        let fragments = self.fragments.lock().unwrap().clone();
        Ok(Box::pin(futures::stream::iter(
            fragments.into_iter().map(Ok),
        )))
    }
}

// --- Test-Specific Helpers ---
#[cfg(feature = "pdf")]
pub mod helpers {
    use anyhow::Result;
    use printpdf::{
        BuiltinFont, Layer, Mm, Op, ParsedFont, PdfDocument, PdfPage, PdfSaveOptions, Pt, TextItem,
        TextMatrix, TextRenderingMode,
    };

    /// Generates a simple, single-page PDF with the given text content,
    /// compatible with printpdf v0.8.2.
    pub fn generate_test_pdf(text: &str) -> Result<Vec<u8>> {
        let mut doc = PdfDocument::new("Test PDF");
        let mut page = PdfPage::new(Mm(210.0), Mm(297.0), vec![]);
        let layer_def = Layer::new("Layer 1");
        let layer_id = doc.add_layer(&layer_def);

        let font_bytes = BuiltinFont::Helvetica.get_subset_font().bytes;
        let font = ParsedFont::from_bytes(&font_bytes, 0, &mut Vec::new())
            .ok_or_else(|| anyhow::anyhow!("Failed to parse built-in font"))?;
        let font_id = doc.add_font(&font);

        let ops = vec![
            Op::BeginLayer {
                layer_id: layer_id.clone(),
            },
            Op::SetFontSize {
                size: Pt(12.0),
                font: font_id.clone(),
            },
            Op::StartTextSection,
            Op::SetTextMatrix {
                matrix: TextMatrix::Translate(Mm(10.0).into(), Mm(280.0).into()),
            },
            Op::SetTextRenderingMode {
                mode: TextRenderingMode::Fill,
            },
            Op::WriteText {
                items: vec![TextItem::Text(text.to_string())],
                font: font_id,
            },
            Op::EndTextSection,
            Op::EndLayer { layer_id },
        ];

        page.ops = ops;
        doc.pages.push(page);

        let mut warnings = Vec::new();
        let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            eprintln!("PDF generation warnings: {warnings:?}");
        }

        Ok(bytes)
    }
}
