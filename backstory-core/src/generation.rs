//! Backstory text generation.
//!
//! [`Generator`] is the seam between the request handler and the remote
//! model. [`OpenAiGenerator`] is the production implementation; tests use
//! [`crate::testing::ScriptedGenerator`].

use crate::settings::Settings;
use async_trait::async_trait;
use openai::{Message, OpenAi, Request};
use thiserror::Error;
use tracing::{error, info, warn};

/// Sampling temperature used for every request.
pub const TEMPERATURE: f32 = 0.8;

/// Shown when a successful response carries no usable text.
pub const FALLBACK_TEXT: &str = "Error getting response.";

/// Errors from a generation attempt.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The endpoint answered with a non-success status.
    #[error("OpenAI API Error: {message}")]
    Remote { status: u16, message: String },

    /// The request never got an answer. Details are logged, not shown.
    #[error("Error querying the completion endpoint.")]
    Transport(String),

    /// The endpoint answered, but without a first completion's text.
    #[error("Error getting response.")]
    EmptyCompletion,

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<openai::Error> for GenerationError {
    fn from(err: openai::Error) -> Self {
        match err {
            openai::Error::Api { status, message } => GenerationError::Remote { status, message },
            openai::Error::Network(detail) => GenerationError::Transport(detail),
            openai::Error::Parse(_) => GenerationError::EmptyCompletion,
            openai::Error::NoApiKey => GenerationError::Config("API key not configured".into()),
            openai::Error::Config(detail) => GenerationError::Config(detail),
        }
    }
}

/// Outcome of one generation attempt: the model's text, or why there is none.
pub type GenerationResult = Result<String, GenerationError>;

/// Something that turns a prompt into prose.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> GenerationResult;
}

/// Generator backed by the OpenAI chat completions endpoint.
#[derive(Clone)]
pub struct OpenAiGenerator {
    client: OpenAi,
}

impl OpenAiGenerator {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: OpenAi::new(api_key).with_model(model),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.openai_key, &settings.openai_model).with_base_url(&settings.api_base)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.client = self.client.with_base_url(base_url);
        self
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }
}

#[async_trait]
impl Generator for OpenAiGenerator {
    async fn generate(&self, prompt: &str) -> GenerationResult {
        info!(model = self.client.model(), prompt_len = prompt.len(), "requesting backstory");

        let request = Request::new(vec![Message::user(prompt)]).with_temperature(TEMPERATURE);
        let response = match self.client.complete(request).await {
            Ok(response) => response,
            Err(err) => {
                let err = GenerationError::from(err);
                match &err {
                    GenerationError::Transport(detail) => {
                        error!(%detail, "completion request failed")
                    }
                    other => warn!(error = %other, "completion endpoint returned an error"),
                }
                return Err(err);
            }
        };

        match response.text() {
            Some(text) if !text.trim().is_empty() => {
                info!(chars = text.len(), "backstory received");
                Ok(text.to_string())
            }
            _ => {
                warn!(choices = response.choices.len(), "response had no completion text");
                Err(GenerationError::EmptyCompletion)
            }
        }
    }
}

/// One-shot generation: send `prompt` to the completion endpoint under
/// `api_base` and return the first completion's text.
pub async fn generate(
    prompt: &str,
    api_key: &str,
    model: &str,
    api_base: &str,
) -> GenerationResult {
    OpenAiGenerator::new(api_key, model)
        .with_base_url(api_base)
        .generate(prompt)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping() {
        let remote = GenerationError::from(openai::Error::Api {
            status: 401,
            message: "bad key".to_string(),
        });
        assert_eq!(remote.to_string(), "OpenAI API Error: bad key");

        let transport = GenerationError::from(openai::Error::Network("dns failure".into()));
        assert!(matches!(transport, GenerationError::Transport(ref d) if d == "dns failure"));
        assert!(!transport.to_string().contains("dns"));

        let parse = GenerationError::from(openai::Error::Parse("eof".into()));
        assert_eq!(parse.to_string(), FALLBACK_TEXT);
    }

    #[test]
    fn test_from_settings() {
        let mut settings = Settings::default();
        settings.openai_model = "gpt-4o-mini".to_string();
        let generator = OpenAiGenerator::from_settings(&settings);
        assert_eq!(generator.model(), "gpt-4o-mini");
    }
}
