use api_shared::SubmissionRes;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tourdesk_core::{FieldError, RunMode, ValidationErrors};

/// Errors a handler can answer with. Each maps to a status and a `SubmissionRes` envelope.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("bad request: {0}")]
    BadRequest(&'static str),

    #[error("not found: {0}")]
    NotFound(&'static str),

    #[error("request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("internal error: {message}")]
    Internal { message: String, expose: bool },
}

impl ApiError {
    /// Internal failure; the detail is only sent to the client outside production.
    pub fn internal(mode: RunMode, error: impl std::fmt::Display) -> Self {
        ApiError::Internal {
            message: error.to_string(),
            expose: !mode.is_production(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, SubmissionRes::validation(errors))
            }
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, SubmissionRes::failure(message))
            }
            ApiError::PayloadTooLarge { limit } => {
                let errors = ValidationErrors::from(vec![FieldError::new(
                    "body",
                    format!(
                        "Request body exceeds the {} MB limit",
                        limit.div_ceil(1024 * 1024)
                    ),
                )]);
                (
                    StatusCode::PAYLOAD_TOO_LARGE,
                    SubmissionRes::validation(errors),
                )
            }
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, SubmissionRes::failure(message)),
            ApiError::Internal { message, expose } => {
                tracing::error!("Internal error: {message}");
                let detail = if expose {
                    message
                } else {
                    "An unexpected error occurred".to_string()
                };
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    SubmissionRes::internal(detail),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
