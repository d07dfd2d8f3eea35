use askdoc::pipeline::StageError;
use askdoc::{AskError, CompletionError, Stage};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// A custom error type for the server application.
///
/// Pipeline failures carry the stage they arose in; the response body
/// reports both the terminal `failed` state and that originating stage so
/// the caller can tell an upload problem from a service problem.
pub enum AppError {
    /// Errors originating from the ask pipeline.
    Ask(AskError),
    /// Malformed request payloads (e.g. invalid base64).
    BadRequest(String),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

impl From<AskError> for AppError {
    fn from(err: AskError) -> Self {
        AppError::Ask(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, stage, error_message) = match self {
            AppError::Ask(err) => {
                error!("AskError: {:?}", err);
                let status = match &err.source {
                    StageError::Extract(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    StageError::Completion(completion_err) => match completion_err {
                        CompletionError::Request(_)
                        | CompletionError::Deserialization(_)
                        | CompletionError::Api(_) => StatusCode::BAD_GATEWAY,
                        _ => StatusCode::INTERNAL_SERVER_ERROR,
                    },
                    StageError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, Some(err.stage), err.to_string())
            }
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, None, message),
            AppError::Internal(err) => {
                error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    None,
                    "An internal server error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "state": Stage::Failed,
            "stage": stage,
            "error": error_message,
        }));

        (status_code, body).into_response()
    }
}
