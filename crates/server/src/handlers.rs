//! # Route Handlers
//!
//! The HTTP surface of the ask pipeline: question answering over uploaded
//! documents (full or streaming) and markdown-to-`.docx` export. Uploads
//! travel as base64 payloads in JSON bodies; rendered documents travel
//! back the same way, or as a direct download for `/export`.

use crate::errors::AppError;
use crate::state::AppState;
use askdoc::extract::UploadedDocument;
use askdoc::{AskOptions, Stage, DEFAULT_DOCUMENT_TITLE};
use axum::{
    extract::State,
    http::header,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    Json,
};
use base64::{engine::general_purpose, Engine as _};
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use tracing::info;

// --- API Payloads ---

#[derive(Deserialize)]
pub struct DocumentPayload {
    pub file_name: String,
    pub mime_type: String,
    pub data_base64: String,
}

#[derive(Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub documents: Vec<DocumentPayload>,
    #[serde(flatten)]
    pub options: AskOptions,
}

#[derive(Serialize)]
pub struct WarningPayload {
    pub source: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct AskResponse {
    pub answer: String,
    pub had_candidate: bool,
    pub state: Stage,
    pub warnings: Vec<WarningPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_base64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_file_name: Option<String>,
}

#[derive(Deserialize)]
pub struct ExportRequest {
    pub text: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub tip: Option<String>,
}

// --- Handlers ---

/// The root handler.
pub async fn root() -> &'static str {
    "askdoc server is running."
}

/// The health check handler.
pub async fn health_check() -> &'static str {
    "OK"
}

fn decode_documents(payloads: Vec<DocumentPayload>) -> Result<Vec<UploadedDocument>, AppError> {
    payloads
        .into_iter()
        .map(|payload| {
            let bytes = general_purpose::STANDARD
                .decode(&payload.data_base64)
                .map_err(|e| {
                    AppError::BadRequest(format!(
                        "Invalid base64 payload for '{}': {e}",
                        payload.file_name
                    ))
                })?;
            Ok(UploadedDocument {
                file_name: payload.file_name,
                mime_type: payload.mime_type,
                bytes,
            })
        })
        .collect()
}

/// Handler for the `/ask` endpoint: runs the full pipeline and returns the
/// answer, per-file warnings, and (when requested) the rendered document.
pub async fn ask_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<AskRequest>,
) -> Result<Json<AskResponse>, AppError> {
    info!(documents = payload.documents.len(), "Received ask request");
    let documents = decode_documents(payload.documents)?;

    let outcome = app_state.client.ask(documents, payload.options).await?;

    let (document_base64, document_file_name) = match outcome.rendered_document {
        Some(rendered) => (
            Some(general_purpose::STANDARD.encode(&rendered.bytes)),
            Some(rendered.file_name),
        ),
        None => (None, None),
    };

    Ok(Json(AskResponse {
        answer: outcome.answer,
        had_candidate: outcome.had_candidate,
        state: outcome.stage,
        warnings: outcome
            .warnings
            .into_iter()
            .map(|w| WarningPayload {
                source: w.source,
                message: w.message,
            })
            .collect(),
        document_base64,
        document_file_name,
    }))
}

/// Handler for the `/ask/stream` endpoint: relays completion fragments as
/// server-sent events, in arrival order. Extraction warnings precede the
/// answer as `warning` events.
pub async fn ask_stream_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<AskRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    info!(
        documents = payload.documents.len(),
        "Received streaming ask request"
    );
    let documents = decode_documents(payload.documents)?;

    let streaming = app_state
        .client
        .ask_stream(documents, payload.options)
        .await?;

    let warning_events: Vec<Result<Event, Infallible>> = streaming
        .warnings
        .into_iter()
        .map(|w| {
            Ok(Event::default()
                .event("warning")
                .data(format!("{}: {}", w.source, w.message)))
        })
        .collect();

    let fragment_events = streaming.stream.map(|fragment| {
        Ok(match fragment {
            Ok(text) => Event::default().data(text),
            Err(e) => Event::default().event("error").data(e.to_string()),
        })
    });

    let events = futures::stream::iter(warning_events).chain(fragment_events);
    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

/// Handler for the `/export` endpoint: renders markdown-subset text to a
/// downloadable `.docx` document.
pub async fn export_handler(
    Json(payload): Json<ExportRequest>,
) -> Result<impl IntoResponse, AppError> {
    let title = payload.title.as_deref().unwrap_or(DEFAULT_DOCUMENT_TITLE);
    let bytes =
        askdoc_render::render_generated_document(title, &payload.text, payload.tip.as_deref())
            .map_err(|e| AppError::Internal(anyhow::Error::new(e)))?;

    let file_name = format!(
        "askdoc_export_{}.docx",
        chrono::Utc::now().format("%Y%m%d_%H%M%S")
    );
    info!(%file_name, len = bytes.len(), "Rendered export document");

    let headers = [
        (
            header::CONTENT_TYPE,
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document".to_string(),
        ),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        ),
    ];
    Ok((headers, bytes))
}
