//! Prometheus metrics for generate-service.
//!
//! HTTP-level counters come from `service_core::middleware::metrics_middleware`;
//! this module adds generation outcomes and renders everything for `/metrics`.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::sync::{Mutex, OnceLock, PoisonError};
use std::time::Duration;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
static INSTALL_LOCK: Mutex<()> = Mutex::new(());

/// Install the global Prometheus recorder. Later calls are no-ops.
pub fn init_metrics() -> Result<(), BuildError> {
    // Held across check and install so concurrent callers install once.
    let _guard = INSTALL_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    if METRICS_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = METRICS_HANDLE.set(handle);
    Ok(())
}

/// Metrics in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

/// Record one `/generate` call to the model, `status` being `ok` or `error`.
pub fn record_generation(model: &str, status: &'static str, elapsed: Duration) {
    let model = model.to_string();

    counter!(
        "generate_requests_total",
        "model" => model.clone(),
        "status" => status
    )
    .increment(1);
    histogram!("generate_request_duration_seconds", "model" => model)
        .record(elapsed.as_secs_f64());
}

/// Record token usage reported by the backend.
pub fn record_tokens(model: &str, input: Option<u32>, output: Option<u32>) {
    if let Some(n) = input {
        counter!("generate_tokens_total", "model" => model.to_string(), "type" => "input")
            .increment(u64::from(n));
    }
    if let Some(n) = output {
        counter!("generate_tokens_total", "model" => model.to_string(), "type" => "output")
            .increment(u64::from(n));
    }
}
