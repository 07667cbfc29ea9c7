use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::startup::AppState;

/// Liveness probe. Does not touch the model server.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "generate-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe: ready only while the model server answers.
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.text_provider.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "model": state.text_provider.model()
            })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Model server not ready");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unavailable",
                    "model": state.text_provider.model(),
                    "error": e.to_string()
                })),
            )
        }
    }
}
