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

// --- Gemini-specific request and response structures ---

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize, Debug)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: ContentResponse,
}

#[derive(Deserialize, Debug, Default)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize, Debug)]
struct PartResponse {
    text: String,
}

// --- Gemini Provider implementation ---

/// A provider for interacting with the Google Gemini API.
///
/// `api_url` is the model's `generateContent` endpoint; the streaming
/// variant is derived from it. The API key is held for the provider's
/// lifetime and never logged.
#[derive(Clone)]
pub struct GeminiProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: String,
}

impl fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl GeminiProvider {
    /// Creates a new `GeminiProvider`.
    pub fn new(api_url: String, api_key: String) -> Result<Self, CompletionError> {
        if api_key.is_empty() {
            return Err(CompletionError::MissingApiKey);
        }
        let client = ReqwestClient::builder()
            .build()
            .map_err(CompletionError::ClientBuild)?;
        Ok(Self {
            client,
            api_url,
            api_key,
        })
    }

    fn request_body(prompt: &str) -> GeminiRequest {
        GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        }
    }

    fn stream_url(&self) -> String {
        if self.api_url.contains(":generateContent") {
            self.api_url
                .replace(":generateContent", ":streamGenerateContent")
        } else {
            self.api_url.clone()
        }
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    async fn complete(&self, prompt: &str) -> Result<CompletionResult, CompletionError> {
        let response = self
            .client
            .post(&self.api_url)
            .query(&[("key", self.api_key.as_str())])
            .json(&Self::request_body(prompt))
            .send()
            .await
            .map_err(CompletionError::Request)?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CompletionError::Api(error_text));
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(CompletionError::Deserialization)?;

        let had_candidate = !gemini_response.candidates.is_empty();
        let raw_text = gemini_response
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<String>()
            })
            .unwrap_or_default();

        Ok(CompletionResult {
            raw_text,
            had_candidate,
        })
    }

    async fn complete_stream(&self, prompt: &str) -> Result<CompletionStream, CompletionError> {
        let response = self
            .client
            .post(self.stream_url())
            .query(&[("key", self.api_key.as_str()), ("alt", "sse")])
            .json(&Self::request_body(prompt))
            .send()
            .await
            .map_err(CompletionError::Request)?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CompletionError::Api(error_text));
        }

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
                    if payload.is_empty() {
                        continue;
                    }
                    let parsed: GeminiResponse = match serde_json::from_str(payload) {
                        Ok(parsed) => parsed,
                        Err(e) => {
                            warn!("Skipping unparsable stream payload: {e}");
                            continue;
                        }
                    };
                    for candidate in &parsed.candidates {
                        for part in &candidate.content.parts {
                            // A failed send means the consumer dropped the
                            // stream; stop reading so the connection closes.
                            if sender.send(Ok(part.text.clone())).is_err() {
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
