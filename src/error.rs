use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;

use crate::models::email_db::EmailDBError;
use crate::services::llm_service::CompletionError;

/// Every failure a request handler can surface. Rendered as `{"error": <display>}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("API quota exceeded. Please check your billing status.")]
    RateLimited,

    #[error("Invalid API key. Please check your configuration.")]
    UpstreamAuth,

    #[error("{0}")]
    UpstreamProcessing(String),

    #[error("Internal Server Error")]
    Storage(#[from] EmailDBError),

    #[error("Internal server error")]
    Internal(String),
}

impl From<CompletionError> for ApiError {
    fn from(error: CompletionError) -> Self {
        match error {
            CompletionError::QuotaExceeded(_) => ApiError::RateLimited,
            CompletionError::InvalidCredentials(_) => ApiError::UpstreamAuth,
            CompletionError::Provider(_) => ApiError::UpstreamProcessing(
                "Failed to process request with the language model".to_string(),
            ),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized | ApiError::UpstreamAuth => StatusCode::UNAUTHORIZED,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::UpstreamProcessing(_) | ApiError::Storage(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}
