//! Error types for startup, the image provider boundary and request handling.

use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

/// Fixed message returned when the provider answers without any image.
pub const NO_IMAGE_MESSAGE: &str = "no image data found";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} must be a valid number, got '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Failures reported by an `ImageGenerationClient`.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("request to image provider failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx answer from the provider API.
    #[error("provider returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("failed to decode image data: {0}")]
    Decode(String),

    #[error("image generation timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("{0}")]
    Other(String),
}

/// Outcome of a failed `/generate-image` call.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    GenerationFailed(String),

    #[error("{}", NO_IMAGE_MESSAGE)]
    NoImageProduced,
}

impl ResponseError for GenerateError {
    fn status_code(&self) -> StatusCode {
        match self {
            GenerateError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GenerateError::GenerationFailed(_) | GenerateError::NoImageProduced => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}

impl From<ProviderError> for GenerateError {
    fn from(err: ProviderError) -> Self {
        GenerateError::GenerationFailed(err.to_string())
    }
}
