//! # Completion Provider Tests
//!
//! Exercises the Gemini and OpenAI-compatible providers against a mocked
//! HTTP service: the success path, the empty-candidate response, service
//! errors, and the ordered streaming variant.

use askdoc::providers::ai::{gemini::GeminiProvider, local::LocalAiProvider, CompletionProvider};
use askdoc::CompletionError;
use futures::StreamExt;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gemini_provider(server: &MockServer) -> GeminiProvider {
    GeminiProvider::new(
        format!(
            "{}/v1beta/models/gemini-2.0-flash:generateContent",
            server.uri()
        ),
        "test-key".to_string(),
    )
    .unwrap()
}

#[tokio::test]
async fn gemini_success_returns_the_candidate_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [
                {"content": {"parts": [{"text": "The answer is 42."}]}}
            ]
        })))
        .mount(&server)
        .await;

    let result = gemini_provider(&server).complete("prompt").await.unwrap();
    assert!(result.had_candidate);
    assert_eq!(result.raw_text, "The answer is 42.");
}

#[tokio::test]
async fn gemini_concatenates_multi_part_candidates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [
                {"content": {"parts": [{"text": "Hello"}, {"text": " world"}]}}
            ]
        })))
        .mount(&server)
        .await;

    let result = gemini_provider(&server).complete("prompt").await.unwrap();
    assert_eq!(result.raw_text, "Hello world");
}

#[tokio::test]
async fn gemini_empty_candidate_list_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let result = gemini_provider(&server).complete("prompt").await.unwrap();
    assert!(!result.had_candidate);
    assert_eq!(result.raw_text, "");
}

#[tokio::test]
async fn gemini_service_error_is_an_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let err = gemini_provider(&server).complete("prompt").await.unwrap_err();
    match err {
        CompletionError::Api(body) => assert_eq!(body, "rate limited"),
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn gemini_rejects_an_empty_api_key() {
    let err = GeminiProvider::new("http://localhost".to_string(), String::new()).unwrap_err();
    assert!(matches!(err, CompletionError::MissingApiKey));
}

#[tokio::test]
async fn gemini_stream_yields_fragments_in_order() {
    let server = MockServer::start().await;
    let sse_body = concat!(
        "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"The \"}]}}]}\n\n",
        "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"answer \"}]}}]}\n\n",
        "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"is 42.\"}]}}]}\n\n",
    );
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:streamGenerateContent"))
        .and(query_param("alt", "sse"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(sse_body, "text/event-stream"))
        .mount(&server)
        .await;

    let stream = gemini_provider(&server)
        .complete_stream("prompt")
        .await
        .unwrap();
    let fragments: Vec<String> = stream.map(|f| f.unwrap()).collect::<Vec<_>>().await;
    assert_eq!(fragments, vec!["The ", "answer ", "is 42."]);
}

#[tokio::test]
async fn local_success_returns_the_first_choice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [
                {"message": {"role": "assistant", "content": "Local answer."}}
            ]
        })))
        .mount(&server)
        .await;

    let provider = LocalAiProvider::new(
        format!("{}/v1/chat/completions", server.uri()),
        Some("secret".to_string()),
        Some("qwen".to_string()),
    )
    .unwrap();

    let result = provider.complete("prompt").await.unwrap();
    assert!(result.had_candidate);
    assert_eq!(result.raw_text, "Local answer.");
}

#[tokio::test]
async fn local_empty_choices_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let provider = LocalAiProvider::new(
        format!("{}/v1/chat/completions", server.uri()),
        None,
        None,
    )
    .unwrap();

    let result = provider.complete("prompt").await.unwrap();
    assert!(!result.had_candidate);
}

#[tokio::test]
async fn local_stream_yields_deltas_in_order_and_stops_at_done() {
    let server = MockServer::start().await;
    let sse_body = concat!(
        "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n\n",
        "data: [DONE]\n\n",
    );
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(sse_body, "text/event-stream"))
        .mount(&server)
        .await;

    let provider = LocalAiProvider::new(
        format!("{}/v1/chat/completions", server.uri()),
        None,
        None,
    )
    .unwrap();

    let stream = provider.complete_stream("prompt").await.unwrap();
    let fragments: Vec<String> = stream.map(|f| f.unwrap()).collect::<Vec<_>>().await;
    assert_eq!(fragments.concat(), "Hello");
}
