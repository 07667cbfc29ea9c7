use generate_service::config::PollerConfig;
use generate_service::poller::NumberPoller;
use generate_service::services::build_provider;
use generate_service::startup::shutdown_signal;
use service_core::observability::{init_tracing_to, LogTarget};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = PollerConfig::load()
        .map_err(|e| std::io::Error::other(format!("Configuration error: {}", e)))?;

    // stdout is reserved for generated text.
    init_tracing_to(
        "number-poller",
        "info",
        config.otlp_endpoint.as_deref(),
        LogTarget::Stderr,
    )
    .map_err(|e| std::io::Error::other(format!("Tracing setup error: {}", e)))?;

    let provider = build_provider(config.provider, &config.ollama).map_err(|e| {
        tracing::error!("Failed to initialize text provider: {}", e);
        std::io::Error::other(format!("Provider error: {}", e))
    })?;

    let shutdown = CancellationToken::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        trigger.cancel();
    });

    tracing::info!(
        model = %provider.model(),
        interval_secs = config.interval_secs,
        "Starting number poller"
    );

    let poller = NumberPoller::new(provider, config.interval());
    let mut stdout = std::io::stdout();

    match poller.run(&mut stdout, shutdown).await {
        Ok(iterations) => {
            tracing::info!(iterations, "Number poller stopped");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Number poller failed: {}", e);
            Err(std::io::Error::other(e.to_string()))
        }
    }
}
