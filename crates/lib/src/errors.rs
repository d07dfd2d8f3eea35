use thiserror::Error;

/// Errors produced by the completion layer.
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("Failed to build Reqwest client: {0}")]
    ClientBuild(reqwest::Error),
    #[error("Failed to send request to the completion service: {0}")]
    Request(reqwest::Error),
    #[error("Failed to deserialize completion service response: {0}")]
    Deserialization(reqwest::Error),
    #[error("Completion service returned an error: {0}")]
    Api(String),
    #[error("API key is missing")]
    MissingApiKey,
    #[error("No completion provider is configured")]
    MissingProvider,
}
