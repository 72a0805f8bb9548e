use crate::{ApiError, AppState};
use api_shared::{messages, HealthRes, HealthService, SubmissionRes};
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use tourdesk_core::{
    FieldError, SchemaView, SubmissionError, SubmissionId, ValidationErrors, BOOKING_SCHEMA,
};

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for monitoring and load balancers.
#[axum::debug_handler]
pub(crate) async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/api/submit-form",
    request_body(
        content = Object,
        description = "Booking submission",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Submission accepted (webhook outcome in the body)", body = SubmissionRes),
        (status = 400, description = "Validation error", body = SubmissionRes),
        (status = 413, description = "Request body over the size limit", body = SubmissionRes),
        (status = 500, description = "Internal server error", body = SubmissionRes)
    )
)]
/// Accept a booking submission
///
/// Validates the body against the strict submission schema, forwards it to the configured
/// webhook (if any) and records it. A webhook failure is reported in the success envelope
/// (`webhookDelivered: false`) rather than as an error.
///
/// # Errors
/// Returns `400 Bad Request` if:
/// - the body is not JSON, or
/// - any field fails validation.
///
/// Returns `413 Payload Too Large` if the body is over the configured limit.
///
/// Returns `500 Internal Server Error` if recording the submission fails.
#[axum::debug_handler]
pub(crate) async fn submit_form(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<SubmissionRes>, ApiError> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            tracing::info!(limit = state.body_limit, "Rejected oversized submission body");
            ApiError::PayloadTooLarge {
                limit: state.body_limit,
            }
        } else {
            ApiError::Validation(ValidationErrors::from(vec![FieldError::new(
                "body",
                rejection.body_text(),
            )]))
        }
    })?;

    let payload: serde_json::Value = serde_json::from_slice(&body).map_err(|e| {
        tracing::info!("Rejected submission with malformed body: {e}");
        ApiError::Validation(ValidationErrors::from(vec![FieldError::new(
            "body",
            format!("Request body must be valid JSON: {e}"),
        )]))
    })?;

    match state.service.submit(payload).await {
        Ok(accepted) => Ok(Json(SubmissionRes::accepted(accepted))),
        Err(SubmissionError::Validation(errors)) => {
            tracing::info!(
                fields = ?errors.iter().map(|e| e.field.as_str()).collect::<Vec<_>>(),
                "Rejected invalid submission"
            );
            Err(ApiError::Validation(errors))
        }
        Err(e) => Err(ApiError::internal(state.mode, e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/submissions/{id}",
    params(
        ("id" = String, Path, description = "Submission id (32 lowercase hex characters)")
    ),
    responses(
        (status = 200, description = "Stored submission", body = SubmissionRes),
        (status = 400, description = "Malformed id", body = SubmissionRes),
        (status = 404, description = "Submission not found", body = SubmissionRes)
    )
)]
/// Look up a previously accepted submission by id.
#[axum::debug_handler]
pub(crate) async fn get_submission(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SubmissionRes>, ApiError> {
    let id = SubmissionId::parse(&id).map_err(|e| {
        tracing::debug!("Invalid submission id: {e}");
        ApiError::BadRequest(messages::INVALID_SUBMISSION_ID)
    })?;

    match state.service.find(&id) {
        Ok(Some(record)) => Ok(Json(SubmissionRes::found(record))),
        Ok(None) => Err(ApiError::NotFound(messages::SUBMISSION_NOT_FOUND)),
        Err(e) => Err(ApiError::internal(state.mode, e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/schema/{view}",
    params(
        ("view" = String, Path, description = "`form` or `submission`")
    ),
    responses(
        (status = 200, description = "JSON-Schema descriptor of the booking for the view", body = Object),
        (status = 400, description = "Unknown view", body = SubmissionRes)
    )
)]
/// Booking schema descriptor for the lenient form view or the strict submission view.
#[axum::debug_handler]
pub(crate) async fn get_schema(
    State(_state): State<AppState>,
    Path(view): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let view: SchemaView = view.parse().map_err(|e: String| {
        ApiError::Validation(ValidationErrors::from(vec![FieldError::new("view", e)]))
    })?;

    Ok(Json(BOOKING_SCHEMA.descriptor(view)))
}

