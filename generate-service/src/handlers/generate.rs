use axum::{extract::rejection::JsonRejection, extract::State, Json};
use service_core::error::AppError;
use std::time::Instant;

use crate::models::{GenerateRequest, GenerateResponse};
use crate::services::metrics::{record_generation, record_tokens};
use crate::startup::AppState;

/// `POST /generate`: forward the prompt to the model and return its text.
///
/// Any provider failure becomes a single 500 carrying the provider's message;
/// nothing is retried.
#[tracing::instrument(skip(state, payload))]
pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Rejected generate request");
        AppError::from(rejection)
    })?;

    let model = state.text_provider.model().to_string();
    let start = Instant::now();

    match state.text_provider.generate(&request.query).await {
        Ok(response) => {
            record_generation(&model, "ok", start.elapsed());
            record_tokens(&response.model, response.input_tokens, response.output_tokens);

            tracing::info!(
                model = %response.model,
                prompt_len = request.query.len(),
                response_len = response.text.len(),
                finish_reason = response.finish_reason.as_str(),
                "Generation completed"
            );

            Ok(Json(GenerateResponse {
                text_response: response.text,
            }))
        }
        Err(e) => {
            record_generation(&model, "error", start.elapsed());
            tracing::error!(model = %model, error = %e, "Generation failed");
            Err(AppError::GenerationFailed(e.to_string()))
        }
    }
}
