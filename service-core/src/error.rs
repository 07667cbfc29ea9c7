use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// The upstream model call failed. Carries the provider's error text verbatim.
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// An extractor refused the request before it reached a handler.
    #[error("Request rejected: {1}")]
    Rejected(StatusCode, String),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Rejected(rejection.status(), rejection.body_text())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::GenerationFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Rejected(status, _) => *status,
            AppError::InternalError(_) | AppError::ConfigError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
            detail: String,
        }

        let status = self.status();
        let (error_message, detail) = match self {
            AppError::GenerationFailed(msg) => ("Generation failed", msg),
            AppError::Rejected(_, msg) => ("Invalid request", msg),
            AppError::InternalError(err) => ("Internal server error", format!("{:#}", err)),
            AppError::ConfigError(err) => ("Configuration error", err.to_string()),
        };

        (
            status,
            Json(ErrorResponse {
                error: error_message.to_string(),
                detail,
            }),
        )
            .into_response()
    }
}
