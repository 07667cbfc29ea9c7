//! Mock provider for tests and for running without a model server.

use super::{FinishReason, ProviderError, ProviderResponse, TextProvider};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use tokio::time::Instant;

/// What the mock answers once its script is exhausted.
#[derive(Debug, Clone)]
enum Fallback {
    Echo,
    Reply(String),
    Fail(ProviderError),
}

/// A prompt the mock received, with the tokio instant it arrived.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub prompt: String,
    pub at: Instant,
}

/// Mock text provider.
///
/// Answers from a queue of scripted outcomes first, then from its fallback.
/// Every prompt is recorded so tests can assert on what was sent and when.
pub struct MockTextProvider {
    enabled: bool,
    model: String,
    fallback: Fallback,
    script: Mutex<VecDeque<Result<String, ProviderError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTextProvider {
    /// Echoing mock; a disabled mock reports `NotConfigured` for everything.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            model: "mock".to_string(),
            fallback: Fallback::Echo,
            script: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always answers `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            fallback: Fallback::Reply(text.into()),
            ..Self::new(true)
        }
    }

    /// Always fails with an API error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            fallback: Fallback::Fail(ProviderError::Api {
                status: 500,
                message: message.into(),
            }),
            ..Self::new(true)
        }
    }

    /// Answer the given outcomes in order before falling back to echoing.
    pub fn with_script(self, outcomes: Vec<Result<String, ProviderError>>) -> Self {
        *self.script.lock().unwrap_or_else(PoisonError::into_inner) = outcomes.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.prompt).collect()
    }

    fn next_outcome(&self, prompt: &str) -> Result<String, ProviderError> {
        let scripted = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        match scripted {
            Some(outcome) => outcome,
            None => match &self.fallback {
                Fallback::Echo => Ok(format!("Mock response for: {}", prompt)),
                Fallback::Reply(text) => Ok(text.clone()),
                Fallback::Fail(err) => Err(err.clone()),
            },
        }
    }
}

/// Saturates at `u32::MAX` instead of wrapping.
fn token_count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(&self, prompt: &str) -> Result<ProviderResponse, ProviderError> {
        if !self.enabled {
            return Err(ProviderError::NotConfigured(
                "Mock text provider not enabled".to_string(),
            ));
        }

        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedCall {
                prompt: prompt.to_string(),
                at: Instant::now(),
            });

        let text = self.next_outcome(prompt)?;
        let output_tokens = token_count(text.split_whitespace().count());

        Ok(ProviderResponse {
            text,
            model: self.model.clone(),
            input_tokens: Some(token_count(prompt.len() / 4)),
            output_tokens: Some(output_tokens),
            finish_reason: FinishReason::Complete,
        })
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.enabled {
            Ok(())
        } else {
            Err(ProviderError::NotConfigured(
                "Mock text provider not enabled".to_string(),
            ))
        }
    }
}
