//! # API REST
//!
//! REST API implementation for tourdesk.
//!
//! Handles:
//! - HTTP endpoints with axum (`POST /api/submit-form` and the lookup/schema/health routes)
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON envelopes, status codes, CORS, body size)
//!
//! Uses `api-shared` for response types and `tourdesk-core` for everything else.

#![warn(rust_2018_idioms)]

mod error;
mod handlers;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use api_shared::routes;
use tourdesk_core::{RunMode, SubmissionService};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use error::ApiError;

pub use api_shared::{MAX_REQUEST_BYTES, SUBMIT_PATH};

/// Application state shared across REST API handlers
#[derive(Clone)]
pub struct AppState {
    service: SubmissionService,
    mode: RunMode,
    body_limit: usize,
}

impl AppState {
    pub fn new(service: SubmissionService, mode: RunMode) -> Self {
        Self {
            service,
            mode,
            body_limit: MAX_REQUEST_BYTES,
        }
    }

    /// Overrides the request body limit (default [`MAX_REQUEST_BYTES`]).
    pub fn with_body_limit(mut self, body_limit: usize) -> Self {
        self.body_limit = body_limit;
        self
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::submit_form,
        handlers::get_submission,
        handlers::get_schema,
    ),
    components(schemas(
        api_shared::HealthRes,
        api_shared::SubmissionRes,
        api_shared::FieldErrorRes,
        api_shared::RecordRes,
    ))
)]
pub struct ApiDoc;

/// Builds the router with all routes, Swagger UI, CORS and the body limit.
pub fn app(state: AppState) -> Router {
    let body_limit = state.body_limit;

    Router::new()
        .route(routes::HEALTH_PATH, get(handlers::health))
        .route(routes::SUBMIT_PATH, post(handlers::submit_form))
        .route(
            &format!("{}/:id", routes::SUBMISSIONS_PATH),
            get(handlers::get_submission),
        )
        .route(
            &format!("{}/:view", routes::SCHEMA_PATH),
            get(handlers::get_schema),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
