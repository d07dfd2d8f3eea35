//! # Pipeline Orchestration Tests
//!
//! End-to-end runs of `AskClient::ask` against the mock completion
//! provider: batch partial failure, the empty-candidate path, stage-tagged
//! errors, document rendering, and streaming order.

use askdoc::extract::{DocumentKind, ExtractError, Extractor, ExtractorRegistry, UploadedDocument};
use askdoc::{AskClientBuilder, AskOptions, Stage, NO_RESPONSE_MESSAGE};
use askdoc_test_utils::MockCompletionProvider;
use async_trait::async_trait;
use futures::StreamExt;
use std::sync::Arc;

struct Utf8Extractor;

#[async_trait]
impl Extractor for Utf8Extractor {
    async fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        Ok(String::from_utf8(bytes.to_vec())?)
    }
}

fn text_registry() -> Arc<ExtractorRegistry> {
    let mut registry = ExtractorRegistry::new();
    registry.register(DocumentKind::PlainText, Box::new(Utf8Extractor));
    Arc::new(registry)
}

fn upload(name: &str, mime: &str, bytes: &[u8]) -> UploadedDocument {
    UploadedDocument {
        file_name: name.to_string(),
        mime_type: mime.to_string(),
        bytes: bytes.to_vec(),
    }
}

fn client_with(provider: &MockCompletionProvider) -> askdoc::AskClient {
    AskClientBuilder::new()
        .completion_provider(Box::new(provider.clone()))
        .extractor_registry(text_registry())
        .build()
        .unwrap()
}

#[tokio::test]
async fn answers_a_question_about_an_uploaded_document() {
    let provider = MockCompletionProvider::new();
    provider.add_response("launch checklist", "The checklist has nine items.");
    let client = client_with(&provider);

    let outcome = client
        .ask(
            vec![upload("notes.txt", "text/plain", b"launch checklist")],
            AskOptions {
                question: "How many items?".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(outcome.answer, "The checklist has nine items.");
    assert!(outcome.had_candidate);
    assert!(outcome.warnings.is_empty());
    assert_eq!(outcome.stage, Stage::Done);

    // The extracted text reached the prompt.
    let calls = provider.get_calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].contains("launch checklist"));
    assert!(calls[0].contains("How many items?"));
}

#[tokio::test]
async fn one_bad_file_produces_a_warning_not_an_abort() {
    let provider = MockCompletionProvider::new();
    provider.add_response("valid content", "answer");
    let client = client_with(&provider);

    let outcome = client
        .ask(
            vec![
                upload("photo.png", "image/png", b"\x89PNG"),
                upload("notes.txt", "text/plain", b"valid content"),
            ],
            AskOptions {
                question: "q".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(outcome.warnings.len(), 1);
    assert_eq!(outcome.warnings[0].source, "photo.png");
    let calls = provider.get_calls();
    assert!(calls[0].contains("valid content"));
    assert!(!calls[0].contains("PNG"));
}

#[tokio::test]
async fn all_files_failing_is_an_extracting_stage_failure() {
    let provider = MockCompletionProvider::new();
    let client = client_with(&provider);

    let err = client
        .ask(
            vec![upload("photo.png", "image/png", b"\x89PNG")],
            AskOptions {
                question: "q".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err.stage, Stage::Extracting);
    assert!(provider.get_calls().is_empty());
}

#[tokio::test]
async fn empty_candidate_list_surfaces_the_no_response_message() {
    let provider = MockCompletionProvider::new();
    provider.set_no_candidate();
    let client = client_with(&provider);

    let outcome = client
        .ask(
            vec![],
            AskOptions {
                question: "q".to_string(),
                render_document: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(outcome.answer, NO_RESPONSE_MESSAGE);
    assert!(!outcome.had_candidate);
    // Nothing to render without a candidate.
    assert!(outcome.rendered_document.is_none());
}

#[tokio::test]
async fn completion_failure_is_a_completing_stage_failure() {
    let provider = MockCompletionProvider::new();
    // No programmed response: the mock reports a service error.
    let client = client_with(&provider);

    let err = client
        .ask(
            vec![],
            AskOptions {
                question: "q".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err.stage, Stage::Completing);
}

#[tokio::test]
async fn requested_document_is_rendered_and_named() {
    let provider = MockCompletionProvider::new();
    provider.add_response("document the code", "# Overview\nThe **add** function.");
    let client = client_with(&provider);

    let outcome = client
        .ask(
            vec![],
            AskOptions {
                question: "document the code".to_string(),
                render_document: true,
                document_title: Some("Code Documentation".to_string()),
                document_tip: Some(
                    "Remember to validate the code syntax before running it.".to_string(),
                ),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let rendered = outcome.rendered_document.unwrap();
    assert!(rendered.file_name.starts_with("code_documentation_"));
    assert!(rendered.file_name.ends_with(".docx"));
    assert_eq!(&rendered.bytes[..2], b"PK");
}

#[tokio::test]
async fn streaming_yields_fragments_in_order() {
    let provider = MockCompletionProvider::new();
    provider.add_fragments(&["The ", "answer ", "is 42."]);
    let client = client_with(&provider);

    let streaming = client
        .ask_stream(
            vec![upload("notes.txt", "text/plain", b"context")],
            AskOptions {
                question: "q".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let fragments: Vec<String> = streaming
        .stream
        .map(|f| f.unwrap())
        .collect::<Vec<_>>()
        .await;
    assert_eq!(fragments, vec!["The ", "answer ", "is 42."]);
    assert_eq!(fragments.concat(), "The answer is 42.");
}
