//! # API Shared
//!
//! Shared definitions for the tourdesk HTTP surface.
//!
//! Contains:
//! - Response envelopes (`SubmissionRes`, `FieldErrorRes`, `RecordRes`)
//! - Shared services like `HealthService`
//! - The user-facing messages the endpoint returns
//! - Route paths and the request size limit
//!
//! Used by `api-rest` to build responses and by `tourdesk-form` to decode them.

pub mod health;
pub mod messages;
pub mod responses;
pub mod routes;

pub use health::{HealthRes, HealthService};
pub use responses::{FieldErrorRes, RecordRes, SubmissionRes};
pub use routes::{MAX_REQUEST_BYTES, SUBMIT_PATH};
