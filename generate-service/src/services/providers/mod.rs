//! Text generation providers.
//!
//! Everything that talks to a model goes through [`TextProvider`], so the
//! HTTP handler and the poller never see transport details. Ollama is the
//! production backend; the mock backs tests and model-less runs.

pub mod mock;
pub mod ollama;

use async_trait::async_trait;
use thiserror::Error;

pub use mock::MockTextProvider;
pub use ollama::OllamaTextProvider;

/// Error type for provider operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    /// The model server could not be reached or did not answer in time.
    #[error("Failed to connect to model server: {0}")]
    Network(String),

    /// The model server answered with a non-success status.
    #[error("{message} (status code: {status})")]
    Api { status: u16, message: String },

    #[error("Invalid response from model server: {0}")]
    InvalidResponse(String),
}

/// Result of a completed generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderResponse {
    pub text: String,

    /// Model that produced the text, as reported by the backend.
    pub model: String,

    pub input_tokens: Option<u32>,
    pub output_tokens: Option<u32>,
    pub finish_reason: FinishReason,
}

/// Reason why generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Complete,
    Length,
    Unknown,
}

impl FinishReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FinishReason::Complete => "complete",
            FinishReason::Length => "length",
            FinishReason::Unknown => "unknown",
        }
    }
}

/// Trait for one-shot, non-streaming text generation against a fixed model.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Generate a completion for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<ProviderResponse, ProviderError>;

    /// Identifier of the model every call is sent to.
    fn model(&self) -> &str;

    /// Health check.
    async fn health_check(&self) -> Result<(), ProviderError>;
}
