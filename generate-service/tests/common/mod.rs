#![allow(dead_code)]

use generate_service::config::{GenerateConfig, OllamaConfig, ProviderKind};
use generate_service::services::TextProvider;
use generate_service::startup::Application;
use service_core::config::Config as CoreConfig;
use std::sync::Arc;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
}

pub fn test_config(provider: ProviderKind, ollama_base_url: &str) -> GenerateConfig {
    GenerateConfig {
        // Random port for testing
        common: CoreConfig { port: 0 },
        provider,
        ollama: OllamaConfig {
            base_url: ollama_base_url.to_string(),
            model: "gemma3".to_string(),
            request_timeout_secs: 5,
        },
        otlp_endpoint: None,
    }
}

impl TestApp {
    /// Spawn the service around the given provider.
    pub async fn spawn(provider: Arc<dyn TextProvider>) -> Self {
        let app = Application::build_with_provider(
            test_config(ProviderKind::Mock, "http://127.0.0.1:9"),
            provider,
        )
        .await
        .expect("Failed to build test application");

        Self::start(app).await
    }

    /// Spawn the service exactly as `main` would for `config`.
    pub async fn spawn_with_config(config: GenerateConfig) -> Self {
        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        Self::start(app).await
    }

    async fn start(app: Application) -> Self {
        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until(std::future::pending()).await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
        }
    }

    pub async fn post_generate(&self, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}/generate", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to send request")
    }
}
