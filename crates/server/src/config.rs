//! # Server Configuration
//!
//! Environment-driven configuration for the `askdoc-server`. The API key
//! is an opaque secret supplied at startup: it is held in memory, redacted
//! from `Debug` output, and never persisted.

use std::env;
use std::fmt;
use thiserror::Error;

/// A custom error type for configuration issues.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidVar(String, String),
}

/// The server configuration, loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// The port for the server to listen on. Loaded from `PORT`.
    pub port: u16,
    /// The completion provider kind ("gemini" or "local"). Loaded from
    /// `AI_PROVIDER`.
    pub ai_provider: String,
    /// The provider's API endpoint. Loaded from `AI_API_URL`; for Gemini
    /// it defaults to the model's `generateContent` endpoint.
    pub ai_api_url: Option<String>,
    /// The provider's API key. Loaded from `AI_API_KEY`.
    pub ai_api_key: Option<String>,
    /// The model identifier. Loaded from `AI_MODEL`.
    pub ai_model: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("ai_provider", &self.ai_provider)
            .field("ai_api_url", &self.ai_api_url)
            .field("ai_api_key", &self.ai_api_key.as_ref().map(|_| "***"))
            .field("ai_model", &self.ai_model)
            .finish()
    }
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

/// Loads the configuration from the environment.
pub fn get_config() -> Result<Config, ConfigError> {
    let port = match env::var("PORT") {
        Ok(value) => value
            .parse()
            .map_err(|e| ConfigError::InvalidVar("PORT".to_string(), format!("{e}")))?,
        Err(_) => 9090,
    };

    let ai_provider = env::var("AI_PROVIDER").unwrap_or_else(|_| "gemini".to_string());
    if ai_provider != "gemini" && ai_provider != "local" {
        return Err(ConfigError::InvalidVar(
            "AI_PROVIDER".to_string(),
            format!("'{ai_provider}' is not a supported provider"),
        ));
    }
    if ai_provider == "gemini" && env::var("AI_API_KEY").is_err() {
        return Err(ConfigError::MissingVar("AI_API_KEY".to_string()));
    }

    Ok(Config {
        port,
        ai_provider,
        ai_api_url: env::var("AI_API_URL").ok(),
        ai_api_key: env::var("AI_API_KEY").ok(),
        ai_model: env::var("AI_MODEL").unwrap_or_else(|_| default_model()),
    })
}
