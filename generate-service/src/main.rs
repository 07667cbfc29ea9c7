use generate_service::config::GenerateConfig;
use generate_service::services::init_metrics;
use generate_service::startup::Application;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = GenerateConfig::load()
        .map_err(|e| std::io::Error::other(format!("Configuration error: {}", e)))?;

    init_tracing("generate-service", "info", config.otlp_endpoint.as_deref())
        .map_err(|e| std::io::Error::other(format!("Tracing setup error: {}", e)))?;

    init_metrics().map_err(|e| {
        tracing::error!("Failed to install metrics recorder: {}", e);
        std::io::Error::other(format!("Metrics setup error: {}", e))
    })?;

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    app.run_until_stopped().await?;

    tracing::info!("Generate service stopped");
    Ok(())
}
