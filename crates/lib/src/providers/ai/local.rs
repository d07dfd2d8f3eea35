use crate::{
    errors::CompletionError,
    providers::ai::{CompletionProvider, CompletionStream},
    types::CompletionResult,
};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::warn;

// --- OpenAI-compatible request and response structures ---

#[derive(Serialize)]
struct LocalAiRequest<'a> {
    messages: Vec<LocalAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    temperature: f32,
    stream: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct LocalAiMessage {
    role: String,
    content: String,
}

#[derive(Deserialize, Debug)]
struct LocalAiResponse {
    #[serde(default)]
    choices: Vec<LocalAiChoice>,
}

#[derive(Deserialize, Debug)]
struct LocalAiChoice {
    message: LocalAiMessage,
}

#[derive(Deserialize, Debug)]
struct LocalAiStreamResponse {
    #[serde(default)]
    choices: Vec<LocalAiStreamChoice>,
}

#[derive(Deserialize, Debug)]
struct LocalAiStreamChoice {
    #[serde(default)]
    delta: LocalAiDelta,
}

#[derive(Deserialize, Debug, Default)]
struct LocalAiDelta {
    #[serde(default)]
    content: Option<String>,
}

// --- Local Provider implementation ---

/// A provider for interacting with a local or OpenAI-compatible API.
#[derive(Clone)]
pub struct LocalAiProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: Option<String>,
    model: Option<String>,
}

impl fmt::Debug for LocalAiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalAiProvider")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl LocalAiProvider {
    /// Creates a new `LocalAiProvider`.
    pub fn new(
        api_url: String,
        api_key: Option<String>,
        model: Option<String>,
    ) -> Result<Self, CompletionError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(CompletionError::ClientBuild)?;
        Ok(Self {
            client,
            api_url,
            api_key,
            model,
        })
    }

    async fn send_request(
        &self,
        prompt: &str,
        stream: bool,
    ) -> Result<reqwest::Response, CompletionError> {
        // The pipeline assembles everything (persona included) into a single
        // message, so the request carries exactly one user turn.
        let request_body = LocalAiRequest {
            messages: vec![LocalAiMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            model: self.model.as_deref(),
            temperature: 0.0,
            stream,
        };

        let mut request_builder = self.client.post(&self.api_url);
        if let Some(key) = &self.api_key {
            request_builder = request_builder.bearer_auth(key);
        }

        let response = request_builder
            .json(&request_body)
            .send()
            .await
            .map_err(CompletionError::Request)?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CompletionError::Api(error_text));
        }
        Ok(response)
    }
}

#[async_trait]
impl CompletionProvider for LocalAiProvider {
    async fn complete(&self, prompt: &str) -> Result<CompletionResult, CompletionError> {
        let response = self.send_request(prompt, false).await?;

        let local_ai_response: LocalAiResponse = response
            .json()
            .await
            .map_err(CompletionError::Deserialization)?;

        let had_candidate = !local_ai_response.choices.is_empty();
        let raw_text = local_ai_response
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .unwrap_or_default();

        Ok(CompletionResult {
            raw_text,
            had_candidate,
        })
    }

    async fn complete_stream(&self, prompt: &str) -> Result<CompletionStream, CompletionError> {
        let response = self.send_request(prompt, true).await?;

        let (sender, receiver) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let mut bytes_stream = response.bytes_stream();
            let mut buffer = String::new();

            while let Some(chunk) = bytes_stream.next().await {
                let bytes = match chunk {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        let _ = sender.send(Err(CompletionError::Request(e)));
                        return;
                    }
                };
                buffer.push_str(&String::from_utf8_lossy(&bytes));

                while let Some(newline) = buffer.find('\n') {
                    let line: String = buffer.drain(..=newline).collect();
                    let Some(payload) = line.trim().strip_prefix("data:") else {
                        continue;
                    };
                    let payload = payload.trim();
                    if payload.is_empty() || payload == "[DONE]" {
                        continue;
                    }
                    let parsed: LocalAiStreamResponse = match serde_json::from_str(payload) {
                        Ok(parsed) => parsed,
                        Err(e) => {
                            warn!("Skipping unparsable stream payload: {e}");
                            continue;
                        }
                    };
                    for choice in &parsed.choices {
                        if let Some(content) = &choice.delta.content {
                            if sender.send(Ok(content.clone())).is_err() {
                                return;
                            }
                        }
                    }
                }
            }
        });

        Ok(Box::pin(UnboundedReceiverStream::new(receiver)))
    }
}
