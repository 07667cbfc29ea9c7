//! Ollama provider implementation.
//!
//! Non-streaming text generation against a local Ollama server through
//! `POST /api/generate`.

use super::{FinishReason, ProviderError, ProviderResponse, TextProvider};
use crate::config::OllamaConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use service_core::observability::TracedClientExt;

/// Ollama text provider.
pub struct OllamaTextProvider {
    config: OllamaConfig,
    client: Client,
}

impl OllamaTextProvider {
    pub fn new(config: OllamaConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| {
                ProviderError::NotConfigured(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/{}", self.config.base_url, path)
    }

    /// Turn a non-success response into an `Api` error, preferring the
    /// `error` field Ollama puts in its JSON bodies.
    async fn api_error(response: reqwest::Response) -> ProviderError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or(body);

        ProviderError::Api { status, message }
    }
}

#[async_trait]
impl TextProvider for OllamaTextProvider {
    #[tracing::instrument(skip_all, fields(prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<ProviderResponse, ProviderError> {
        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
        };

        tracing::debug!(model = %self.config.model, "Sending request to Ollama");

        let response = self
            .client
            .traced_post(&self.api_url("generate"))
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        let finish_reason = match body.done_reason.as_deref() {
            Some("stop") => FinishReason::Complete,
            Some("length") => FinishReason::Length,
            _ if body.done => FinishReason::Complete,
            _ => FinishReason::Unknown,
        };

        tracing::debug!(
            output_tokens = body.eval_count,
            finish_reason = finish_reason.as_str(),
            "Ollama generation finished"
        );

        Ok(ProviderResponse {
            text: body.response,
            model: body.model.unwrap_or_else(|| self.config.model.clone()),
            input_tokens: body.prompt_eval_count,
            output_tokens: body.eval_count,
            finish_reason,
        })
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        let response = self
            .client
            .traced_get(&self.api_url("version"))
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::api_error(response).await)
        }
    }
}

// ============================================================================
// Ollama API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    model: Option<String>,
    response: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    done_reason: Option<String>,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}
