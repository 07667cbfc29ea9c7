pub mod metrics;
pub mod providers;

pub use metrics::{get_metrics, init_metrics};
pub use providers::{
    FinishReason, MockTextProvider, OllamaTextProvider, ProviderError, ProviderResponse,
    TextProvider,
};

use crate::config::{OllamaConfig, ProviderKind};
use std::sync::Arc;

/// Build the provider selected by configuration.
pub fn build_provider(
    kind: ProviderKind,
    ollama: &OllamaConfig,
) -> Result<Arc<dyn TextProvider>, ProviderError> {
    let provider: Arc<dyn TextProvider> = match kind {
        ProviderKind::Ollama => {
            tracing::info!(
                base_url = %ollama.base_url,
                model = %ollama.model,
                "Initialized Ollama text provider"
            );
            Arc::new(OllamaTextProvider::new(ollama.clone())?)
        }
        ProviderKind::Mock => {
            tracing::warn!("GENERATE_PROVIDER=mock, responses will not come from a model");
            Arc::new(MockTextProvider::new(true).with_model(ollama.model.clone()))
        }
    };

    Ok(provider)
}
